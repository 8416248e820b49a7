use std::fmt;

use crate::cursor::{ByteCursor, ReadError};

/// First byte of every two-byte opcode.
pub const ESCAPE: u8 = 0xFE;

/// A one- or two-byte opcode identifier.
///
/// One-byte opcodes keep their byte value; two-byte opcodes are stored as
/// `0xFE00 | second_byte`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(u16);

impl Opcode {
    /// Opcode encoded as a single byte.
    #[inline]
    pub const fn one_byte(byte: u8) -> Self {
        Self(byte as u16)
    }

    /// Opcode encoded as [`ESCAPE`] followed by `byte`.
    #[inline]
    pub const fn extended(byte: u8) -> Self {
        Self(((ESCAPE as u16) << 8) | byte as u16)
    }

    /// Raw identifier value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_extended(self) -> bool {
        self.0 > 0xFF
    }

    /// The byte that selects this opcode within its table.
    #[inline]
    pub const fn table_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Number of bytes the opcode itself occupies in the stream.
    #[inline]
    pub const fn encoded_len(self) -> usize {
        if self.is_extended() { 2 } else { 1 }
    }

    pub const NOP: Self = Self::one_byte(0x00);
    pub const LDC_I4_1: Self = Self::one_byte(0x17);
    pub const JMP: Self = Self::one_byte(0x27);
    pub const CALL: Self = Self::one_byte(0x28);
    pub const CALLI: Self = Self::one_byte(0x29);
    pub const RET: Self = Self::one_byte(0x2A);
    pub const CALLVIRT: Self = Self::one_byte(0x6F);
    pub const NEWOBJ: Self = Self::one_byte(0x73);

    pub const ARGLIST: Self = Self::extended(0x00);
    pub const LDFTN: Self = Self::extended(0x06);
    pub const LDVIRTFTN: Self = Self::extended(0x07);
    pub const UNALIGNED: Self = Self::extended(0x12);
    pub const VOLATILE: Self = Self::extended(0x13);
    pub const TAIL: Self = Self::extended(0x14);
    pub const CONSTRAINED: Self = Self::extended(0x16);
    pub const NO: Self = Self::extended(0x19);
    pub const READONLY: Self = Self::extended(0x1E);
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_extended() {
            write!(f, "{:#06x}", self.0)
        } else {
            write!(f, "{:#04x}", self.0)
        }
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({self})")
    }
}

/// Read the next opcode identifier from `cursor`.
///
/// Unknown identifiers are returned as-is; only a truncated escape sequence
/// is an error here.
pub fn classify(cursor: &mut ByteCursor<'_>) -> Result<Opcode, ReadError> {
    let first = cursor.read_opcode_byte()?;
    if first != ESCAPE {
        return Ok(Opcode::one_byte(first));
    }
    let second = cursor.read_opcode_byte()?;
    Ok(Opcode::extended(second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_one_byte() {
        let mut c = ByteCursor::new(&[0x2A]);
        let op = classify(&mut c).unwrap();
        assert_eq!(op, Opcode::RET);
        assert!(!op.is_extended());
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn classify_escape() {
        let mut c = ByteCursor::new(&[0xFE, 0x01, 0x00]);
        let op = classify(&mut c).unwrap();
        assert_eq!(op.raw(), 0xFE01);
        assert!(op.is_extended());
        assert_eq!(op.table_byte(), 0x01);
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn classify_truncated_escape() {
        let mut c = ByteCursor::new(&[0xFE]);
        let err = classify(&mut c).unwrap_err();
        assert_eq!(
            err,
            ReadError::BufferUnderrun {
                offset: 1,
                width: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn display() {
        assert_eq!(Opcode::RET.to_string(), "0x2a");
        assert_eq!(Opcode::LDFTN.to_string(), "0xfe06");
        assert_eq!(format!("{:?}", Opcode::NOP), "Opcode(0x00)");
    }
}
