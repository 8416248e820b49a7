//! Operand decoding.
//!
//! Reads the bytes an [`OperandShape`] describes and turns them into an
//! [`Operand`]. Metadata tokens are resolved immediately; branch
//! displacements become absolute offsets.

use cild_ir::{Operand, Token, TypeDesc};
use cild_isa::{ByteCursor, OperandShape};

use crate::context::{GenericContext, MetadataResolver};
use crate::error::{DecodeErrorKind, TokenKind};

type Result<T> = std::result::Result<T, DecodeErrorKind>;

/// Operand reader bound to one method's resolver and generic context.
#[derive(Clone, Copy)]
pub struct OperandDecoder<'a> {
    resolver: &'a dyn MetadataResolver,
    generics: GenericContext<'a>,
}

impl<'a> OperandDecoder<'a> {
    pub fn new(resolver: &'a dyn MetadataResolver, generics: GenericContext<'a>) -> Self {
        Self { resolver, generics }
    }

    /// Decode the operand of the instruction starting at `offset`. The
    /// cursor must sit right after the opcode bytes.
    pub fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        shape: OperandShape,
        offset: u32,
    ) -> Result<Operand> {
        Ok(match shape {
            OperandShape::None => Operand::None,
            OperandShape::ImplicitIndex(index) => Operand::UInt(u64::from(index)),
            OperandShape::ImplicitInt(value) => Operand::Int(i64::from(value)),
            OperandShape::Int8 => Operand::Int(i64::from(cursor.read_i8()?)),
            OperandShape::UInt8 => Operand::UInt(u64::from(cursor.read_u8()?)),
            OperandShape::UInt16 => Operand::UInt(u64::from(cursor.read_u16()?)),
            OperandShape::Int32 => Operand::Int(i64::from(cursor.read_i32()?)),
            OperandShape::Int64 => Operand::Int(cursor.read_i64()?),
            OperandShape::Float32 => Operand::Float32(cursor.read_f32()?),
            OperandShape::Float64 => Operand::Float64(cursor.read_f64()?),
            OperandShape::ShortBranch => {
                let delta = i64::from(cursor.read_i8()?);
                Operand::Target(branch_target(cursor, delta, offset)?)
            }
            OperandShape::LongBranch => {
                let delta = i64::from(cursor.read_i32()?);
                Operand::Target(branch_target(cursor, delta, offset)?)
            }
            OperandShape::Switch => Operand::Switch(switch_targets(cursor, offset)?),
            OperandShape::TypeToken => {
                let token = read_token(cursor)?;
                Operand::Type(self.resolve_type(token, offset)?)
            }
            OperandShape::MethodToken => {
                let token = read_token(cursor)?;
                let method = self.resolver.resolve_method(token, self.generics);
                Operand::Method(method.ok_or_else(|| unresolved(token, TokenKind::Method, offset))?)
            }
            OperandShape::FieldToken => {
                let token = read_token(cursor)?;
                let field = self.resolver.resolve_field(token, self.generics);
                Operand::Field(field.ok_or_else(|| unresolved(token, TokenKind::Field, offset))?)
            }
            OperandShape::StringToken => {
                let token = read_token(cursor)?;
                let string = self.resolver.resolve_string(token);
                Operand::String(string.ok_or_else(|| unresolved(token, TokenKind::String, offset))?)
            }
            OperandShape::SignatureToken => {
                let token = read_token(cursor)?;
                let sig = self.resolver.resolve_signature(token, self.generics);
                Operand::Signature(
                    sig.ok_or_else(|| unresolved(token, TokenKind::Signature, offset))?,
                )
            }
            OperandShape::MemberToken => {
                let token = read_token(cursor)?;
                let member = self.resolver.resolve_member(token, self.generics);
                Operand::Token(member.ok_or_else(|| unresolved(token, TokenKind::Member, offset))?)
            }
        })
    }

    /// Resolve a type token, as used by `constrained.` and type operands.
    pub fn resolve_type(&self, token: Token, offset: u32) -> Result<TypeDesc> {
        self.resolver
            .resolve_type(token, self.generics)
            .ok_or_else(|| unresolved(token, TokenKind::Type, offset))
    }
}

pub(crate) fn read_token(cursor: &mut ByteCursor<'_>) -> Result<Token> {
    Ok(Token(cursor.read_u32()?))
}

fn unresolved(token: Token, kind: TokenKind, offset: u32) -> DecodeErrorKind {
    DecodeErrorKind::UnresolvedToken {
        token,
        kind,
        offset,
    }
}

/// `delta` relative to the cursor position, which must already be past the
/// operand.
fn branch_target(cursor: &ByteCursor<'_>, delta: i64, offset: u32) -> Result<u32> {
    let target = cursor.position() as i64 + delta;
    if target < 0 || target > cursor.len() as i64 {
        return Err(DecodeErrorKind::InvalidBranchTarget { offset, target });
    }
    Ok(target as u32)
}

fn switch_targets(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<Vec<u32>> {
    let count = cursor.read_u32()? as usize;
    // A lying count must not drive the allocation.
    let mut deltas = Vec::with_capacity(count.min(cursor.remaining() / 4));
    for _ in 0..count {
        deltas.push(i64::from(cursor.read_i32()?));
    }
    // All displacements are relative to the end of the whole table.
    deltas
        .into_iter()
        .map(|delta| branch_target(cursor, delta, offset))
        .collect()
}
