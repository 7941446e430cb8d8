use bytes::Bytes;
use rugo_error::{RugoResult, rugo_bail, rugo_err};

/// A read cursor over an immutable, fixed byte range.
///
/// Every read checks the remaining length first, so a truncated or hostile buffer fails
/// instead of being read past its end. Byte strings are returned as zero-copy slices of the
/// underlying buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    buffer: Bytes,
    pos: usize,
}

impl ByteCursor {
    pub fn new(buffer: impl Into<Bytes>) -> Self {
        Self {
            buffer: buffer.into(),
            pos: 0,
        }
    }

    /// The offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read a single byte, failing with `UnexpectedEndOfInput` at the end of the range.
    #[inline]
    pub fn read_u8(&mut self) -> RugoResult<u8> {
        let byte = *self.buffer.get(self.pos).ok_or_else(|| {
            rugo_err!(UnexpectedEndOfInput: "unexpected end of input at offset {}", self.pos)
        })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read exactly `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> RugoResult<[u8; N]> {
        if self.remaining() < N {
            rugo_bail!(
                UnexpectedEndOfInput: "needed {} bytes at offset {}, only {} remain",
                N,
                self.pos,
                self.remaining()
            );
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buffer[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Read `len` bytes as a slice of the underlying buffer.
    ///
    /// A length longer than what remains is a malformed length prefix rather than a short
    /// read, so it fails with `InvalidLength`.
    pub fn read_bytes(&mut self, len: usize) -> RugoResult<Bytes> {
        if len > self.remaining() {
            rugo_bail!(
                InvalidLength: "length {} at offset {} exceeds the {} remaining bytes",
                len,
                self.pos,
                self.remaining()
            );
        }
        let bytes = self.buffer.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use rugo_error::RugoError;

    use super::*;

    #[test]
    fn reads_until_end() {
        let mut cursor = ByteCursor::new(Bytes::from_static(&[1, 2, 3]));
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_bytes(2).unwrap().as_ref(), &[2, 3]);
        assert!(cursor.is_empty());
        assert!(matches!(
            cursor.read_u8(),
            Err(RugoError::UnexpectedEndOfInput(..))
        ));
    }

    #[test]
    fn oversized_length_is_invalid() {
        let mut cursor = ByteCursor::new(Bytes::from_static(&[1, 2, 3]));
        assert!(matches!(
            cursor.read_bytes(4),
            Err(RugoError::InvalidLength(..))
        ));
        // A failed read does not move the cursor.
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn fixed_width_reads() {
        let mut cursor = ByteCursor::new(Bytes::from_static(&[0xAA, 0xBB, 0xCC]));
        assert_eq!(cursor.read_array::<2>().unwrap(), [0xAA, 0xBB]);
        assert!(matches!(
            cursor.read_array::<2>(),
            Err(RugoError::UnexpectedEndOfInput(..))
        ));
        assert_eq!(cursor.remaining(), 1);
    }
}
