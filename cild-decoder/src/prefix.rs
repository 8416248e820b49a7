//! Prefix accumulation.
//!
//! Prefix opcodes never produce an instruction of their own. Each one is
//! read into a [`Modifier`] and merged into a [`PendingModifiers`] value,
//! which the driver threads from step to step until the next real
//! instruction consumes it.

use cild_ir::{FlagsContext, InstructionFlags, TypeDesc};
use cild_isa::{ByteCursor, Prefix};

use crate::error::DecodeErrorKind;
use crate::operand::{OperandDecoder, read_token};

/// One decoded prefix together with its operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Modifier {
    Unaligned(u8),
    Volatile,
    Tail,
    Constrained(TypeDesc),
    Readonly,
    /// Mask of the checks the runtime may skip.
    No(u8),
}

impl Modifier {
    pub fn flags(&self) -> InstructionFlags {
        match self {
            Modifier::Unaligned(_) => InstructionFlags::UNALIGNED,
            Modifier::Volatile => InstructionFlags::VOLATILE,
            Modifier::Tail => InstructionFlags::TAIL_CALL,
            Modifier::Constrained(_) => InstructionFlags::CONSTRAINED,
            Modifier::Readonly => InstructionFlags::READONLY,
            Modifier::No(mask) => no_check_flags(*mask),
        }
    }
}

fn no_check_flags(mask: u8) -> InstructionFlags {
    let mut flags = InstructionFlags::empty();
    if mask & 0x1 != 0 {
        flags |= InstructionFlags::NO_TYPE_CHECK;
    }
    if mask & 0x2 != 0 {
        flags |= InstructionFlags::NO_RANGE_CHECK;
    }
    if mask & 0x4 != 0 {
        flags |= InstructionFlags::NO_NULL_CHECK;
    }
    flags
}

/// Read the operand of `prefix`; the cursor sits right after its opcode.
pub fn read_modifier(
    prefix: Prefix,
    cursor: &mut ByteCursor<'_>,
    operands: &OperandDecoder<'_>,
    offset: u32,
) -> Result<Modifier, DecodeErrorKind> {
    Ok(match prefix {
        Prefix::Unaligned => Modifier::Unaligned(cursor.read_u8()?),
        Prefix::Volatile => Modifier::Volatile,
        Prefix::Tail => Modifier::Tail,
        Prefix::Constrained => {
            let token = read_token(cursor)?;
            Modifier::Constrained(operands.resolve_type(token, offset)?)
        }
        Prefix::Readonly => Modifier::Readonly,
        Prefix::No => Modifier::No(cursor.read_u8()?),
    })
}

/// Modifiers seen since the last emitted instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingModifiers {
    context: FlagsContext,
    first_offset: Option<u32>,
}

impl PendingModifiers {
    /// Merge `modifier`, read from the prefix at `offset`.
    #[must_use]
    pub fn with(mut self, modifier: Modifier, offset: u32) -> Self {
        self.first_offset.get_or_insert(offset);
        self.context.flags |= modifier.flags();
        match modifier {
            Modifier::Unaligned(alignment) => self.context.alignment = Some(alignment),
            Modifier::Constrained(ty) => self.context.constrained = Some(ty),
            _ => {}
        }
        self
    }

    /// No prefix has been read since the last instruction.
    pub fn is_empty(&self) -> bool {
        self.first_offset.is_none()
    }

    pub fn flags(&self) -> InstructionFlags {
        self.context.flags
    }

    /// Offset of the first pending prefix.
    pub fn first_offset(&self) -> Option<u32> {
        self.first_offset
    }

    pub fn into_context(self) -> FlagsContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_by_or() {
        let pending = PendingModifiers::default()
            .with(Modifier::Unaligned(2), 0)
            .with(Modifier::Volatile, 3);
        assert_eq!(pending.first_offset(), Some(0));
        let ctx = pending.into_context();
        assert_eq!(
            ctx.flags,
            InstructionFlags::UNALIGNED | InstructionFlags::VOLATILE
        );
        assert_eq!(ctx.alignment, Some(2));
        assert_eq!(ctx.constrained, None);
    }

    #[test]
    fn constrained_records_type() {
        let ctx = PendingModifiers::default()
            .with(Modifier::Constrained(TypeDesc::named("T")), 0)
            .into_context();
        assert_eq!(ctx.flags, InstructionFlags::CONSTRAINED);
        assert_eq!(ctx.constrained, Some(TypeDesc::named("T")));
    }

    #[test]
    fn no_mask_bits() {
        assert_eq!(Modifier::No(0x1).flags(), InstructionFlags::NO_TYPE_CHECK);
        assert_eq!(Modifier::No(0x7).flags(), InstructionFlags::NO_CHECKS);
        assert!(Modifier::No(0x0).flags().is_empty());
    }

    #[test]
    fn empty_mask_still_pending() {
        let pending = PendingModifiers::default().with(Modifier::No(0), 5);
        assert!(!pending.is_empty());
        assert!(pending.flags().is_empty());
    }
}
