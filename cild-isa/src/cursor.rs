/// Errors from [`ByteCursor`] reads.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// A read at `offset` needed `width` bytes but only `remaining` were left.
    #[error("buffer underrun at offset {offset:#06x}: need {width} bytes, {remaining} remaining")]
    BufferUnderrun {
        offset: usize,
        width: usize,
        remaining: usize,
    },
}

/// Sequential little-endian reader over an instruction buffer.
///
/// Every read either consumes exactly the width of the primitive or fails
/// without moving the cursor.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

macro_rules! read_le {
    ($(#[$doc:meta] $name:ident -> $ty:ty;)*) => {
        $(
            #[$doc]
            #[inline]
            pub fn $name(&mut self) -> Result<$ty, ReadError> {
                Ok(<$ty>::from_le_bytes(self.take()?))
            }
        )*
    };
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current read offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(ReadError::BufferUnderrun {
                offset: self.pos,
                width: N,
                remaining,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Read a raw opcode byte.
    #[inline]
    pub fn read_opcode_byte(&mut self) -> Result<u8, ReadError> {
        self.read_u8()
    }

    read_le! {
        /// Read an unsigned 8-bit value.
        read_u8 -> u8;
        /// Read a signed 8-bit value.
        read_i8 -> i8;
        /// Read an unsigned 16-bit value.
        read_u16 -> u16;
        /// Read a signed 16-bit value.
        read_i16 -> i16;
        /// Read an unsigned 32-bit value.
        read_u32 -> u32;
        /// Read a signed 32-bit value.
        read_i32 -> i32;
        /// Read an unsigned 64-bit value.
        read_u64 -> u64;
        /// Read a signed 64-bit value.
        read_i64 -> i64;
        /// Read a 32-bit IEEE 754 float.
        read_f32 -> f32;
        /// Read a 64-bit IEEE 754 float.
        read_f64 -> f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let mut c = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04, 0xff]);
        assert_eq!(c.read_u16().unwrap(), 0x0201);
        assert_eq!(c.position(), 2);
        assert_eq!(c.read_u16().unwrap(), 0x0403);
        assert_eq!(c.read_i8().unwrap(), -1);
        assert!(c.is_at_end());
    }

    #[test]
    fn reads_floats() {
        let mut bytes = 1.5f32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut c = ByteCursor::new(&bytes);
        assert_eq!(c.read_f32().unwrap(), 1.5);
        assert_eq!(c.read_f64().unwrap(), -2.25);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn underrun_reports_offset_and_width() {
        let mut c = ByteCursor::new(&[0x2a, 0x01, 0x02]);
        c.read_u8().unwrap();
        let err = c.read_u32().unwrap_err();
        assert_eq!(
            err,
            ReadError::BufferUnderrun {
                offset: 1,
                width: 4,
                remaining: 2
            }
        );
    }

    #[test]
    fn failed_read_does_not_advance() {
        let mut c = ByteCursor::new(&[0x01, 0x02]);
        c.read_u8().unwrap();
        assert!(c.read_i64().is_err());
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_u8().unwrap(), 0x02);
    }

    #[test]
    fn empty_buffer() {
        let mut c = ByteCursor::new(&[]);
        assert!(c.is_empty());
        assert!(c.is_at_end());
        assert!(matches!(
            c.read_opcode_byte(),
            Err(ReadError::BufferUnderrun { offset: 0, width: 1, .. })
        ));
    }
}
