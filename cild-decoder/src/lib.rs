//! CIL method-body decoder.
//!
//! [`Decoder`] walks the IL bytes of one method and produces a
//! [`DisassembledMethod`]: one [`Instruction`](cild_ir::Instruction) per
//! non-prefix opcode, with prefixes folded into its flags, operands decoded
//! and tokens resolved, stack effects computed and source locations
//! attached. Metadata and debug information come from the traits in
//! [`context`].

pub mod call;
pub mod context;
pub mod driver;
pub mod error;
pub mod location;
pub mod operand;
pub mod prefix;

pub use context::{
    DebugLocationSource, DiagnosticFormatter, GenericContext, MetadataResolver, MethodSource,
    NoDebugInfo, PlainFormatter,
};
pub use driver::{DecodeOptions, Decoder};
pub use error::{DecodeError, DecodeErrorKind, Result, TokenKind, Unsupported};
pub use location::{HIDDEN_LINE, LocationTracker, SequencePoint, SequencePointCursor};

use cild_ir::DisassembledMethod;

/// Decode `source` in one call.
pub fn disassemble(
    source: &dyn MethodSource,
    resolver: &dyn MetadataResolver,
    debug: &mut dyn DebugLocationSource,
    options: DecodeOptions,
) -> Result<DisassembledMethod> {
    Decoder::new(source, resolver, debug, options)?.decode()
}
