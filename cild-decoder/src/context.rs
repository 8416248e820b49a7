//! Collaborator interfaces the decoder depends on.
//!
//! The decoder never reads metadata tables or debug records itself; it asks
//! these traits. Tests and the `cild-file` crate provide in-memory
//! implementations.

use cild_ir::{CallSiteSig, FieldDesc, MemberRef, MethodDesc, SourceLocation, Token, TypeDesc};

/// Generic arguments in scope while resolving tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericContext<'a> {
    /// Arguments of the decoded method (`!!N`).
    pub method_args: &'a [TypeDesc],
    /// Arguments of the method's declaring type (`!N`).
    pub type_args: &'a [TypeDesc],
}

impl<'a> GenericContext<'a> {
    pub fn new(method_args: &'a [TypeDesc], type_args: &'a [TypeDesc]) -> Self {
        Self {
            method_args,
            type_args,
        }
    }
}

/// Resolves metadata tokens to descriptors. `None` means unresolved.
pub trait MetadataResolver {
    fn resolve_type(&self, token: Token, generics: GenericContext<'_>) -> Option<TypeDesc>;

    fn resolve_method(&self, token: Token, generics: GenericContext<'_>) -> Option<MethodDesc>;

    fn resolve_field(&self, token: Token, generics: GenericContext<'_>) -> Option<FieldDesc>;

    fn resolve_string(&self, token: Token) -> Option<String>;

    fn resolve_signature(&self, token: Token, generics: GenericContext<'_>)
    -> Option<CallSiteSig>;

    /// Resolve an `ldtoken` operand, which may name any member kind.
    fn resolve_member(&self, token: Token, generics: GenericContext<'_>) -> Option<MemberRef> {
        if let Some(ty) = self.resolve_type(token, generics) {
            return Some(MemberRef::Type(ty));
        }
        if let Some(method) = self.resolve_method(token, generics) {
            return Some(MemberRef::Method(method));
        }
        self.resolve_field(token, generics).map(MemberRef::Field)
    }
}

/// Sequence-point enumerator, advanced once per decoded opcode.
pub trait DebugLocationSource {
    /// Advance to `offset` and return the location of the newest known
    /// sequence point at or before it, if one was passed since the last call.
    ///
    /// Offsets passed in are non-decreasing within one decode run.
    fn advance_to(&mut self, offset: u32) -> Option<SourceLocation>;
}

/// Location source for methods without debug information.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDebugInfo;

impl DebugLocationSource for NoDebugInfo {
    fn advance_to(&mut self, _offset: u32) -> Option<SourceLocation> {
        None
    }
}

/// Renders a diagnostic message against a source location.
pub trait DiagnosticFormatter {
    fn format(&self, message: &str, location: Option<&SourceLocation>) -> String;
}

/// `document(line,column): message`, or the bare message without a location.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainFormatter;

impl DiagnosticFormatter for PlainFormatter {
    fn format(&self, message: &str, location: Option<&SourceLocation>) -> String {
        match location {
            Some(loc) => format!("{loc}: {message}"),
            None => message.to_string(),
        }
    }
}

/// The method whose body is decoded.
pub trait MethodSource {
    fn method(&self) -> &MethodDesc;

    /// Raw IL bytes, or `None` for methods without a retrievable body.
    fn il_body(&self) -> Option<&[u8]>;

    /// Declared maximum evaluation-stack depth.
    fn max_stack(&self) -> u16;

    fn method_generic_args(&self) -> &[TypeDesc] {
        &self.method().generic_args
    }

    fn type_generic_args(&self) -> &[TypeDesc] {
        &self.method().declaring_type.generic_args
    }
}
