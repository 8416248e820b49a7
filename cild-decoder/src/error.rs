use std::fmt;

use cild_ir::{InstructionFlags, SourceLocation, Token};
use cild_isa::{Opcode, ReadError};

use crate::context::DiagnosticFormatter;

/// Which resolver lookup a token went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Type,
    Method,
    Field,
    String,
    Signature,
    Member,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Type => "type",
            TokenKind::Method => "method",
            TokenKind::Field => "field",
            TokenKind::String => "string",
            TokenKind::Signature => "signature",
            TokenKind::Member => "member",
        })
    }
}

/// Why an opcode could not be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unsupported {
    /// Not part of the supported instruction set.
    Generic,
    /// `ldftn`, emitted when a delegate or lambda closure is created.
    ClosureCapture,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error(transparent)]
    BufferUnderrun(#[from] ReadError),

    #[error("unresolved {kind} token {token} at offset {offset:#06x}")]
    UnresolvedToken {
        token: Token,
        kind: TokenKind,
        offset: u32,
    },

    #[error("unsupported instruction {opcode} at offset {offset:#06x}{}", unsupported_hint(.reason))]
    UnsupportedInstruction {
        opcode: Opcode,
        offset: u32,
        reason: Unsupported,
    },

    #[error("prefix {flags:?} at offset {offset:#06x} is not followed by an instruction")]
    DanglingModifier {
        flags: InstructionFlags,
        offset: u32,
    },

    #[error("invalid use of constructor {method} by opcode {opcode} at offset {offset:#06x}")]
    InvalidConstructorUsage {
        method: String,
        opcode: Opcode,
        offset: u32,
    },

    #[error("method {method} has no IL body")]
    MissingBody { method: String },

    #[error("branch at offset {offset:#06x} targets {target}, outside the method body")]
    InvalidBranchTarget { offset: u32, target: i64 },
}

fn unsupported_hint(reason: &Unsupported) -> &'static str {
    match reason {
        Unsupported::Generic => "",
        Unsupported::ClosureCapture => " (closures and delegate creation are not supported)",
    }
}

impl DecodeErrorKind {
    /// Byte offset the error refers to, when known.
    pub fn offset(&self) -> Option<u32> {
        match self {
            DecodeErrorKind::BufferUnderrun(ReadError::BufferUnderrun { offset, .. }) => {
                u32::try_from(*offset).ok()
            }
            DecodeErrorKind::UnresolvedToken { offset, .. }
            | DecodeErrorKind::UnsupportedInstruction { offset, .. }
            | DecodeErrorKind::DanglingModifier { offset, .. }
            | DecodeErrorKind::InvalidConstructorUsage { offset, .. }
            | DecodeErrorKind::InvalidBranchTarget { offset, .. } => Some(*offset),
            DecodeErrorKind::MissingBody { .. } => None,
        }
    }
}

/// A failed decode run.
///
/// Carries the sequence point current at the failure and the
/// compilation-stack frames supplied through
/// [`DecodeOptions`](crate::DecodeOptions).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub location: Option<SourceLocation>,
    pub context: Vec<String>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            location: None,
            context: Vec::new(),
        }
    }

    /// Render the message with `formatter`, followed by one indented line
    /// per context frame.
    pub fn render(&self, formatter: &dyn DiagnosticFormatter) -> String {
        let mut out = formatter.format(&self.kind.to_string(), self.location.as_ref());
        for frame in &self.context {
            out.push_str("\n  while ");
            out.push_str(frame);
        }
        out
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<ReadError> for DecodeError {
    fn from(err: ReadError) -> Self {
        Self::new(err.into())
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
