use std::io;
use std::ops::Range;
use std::sync::Arc;

use bytes::Bytes;

/// A trait for types that support blocking positional reads.
///
/// Reads never move a shared cursor, so a single reader may serve any number of
/// independent requests.
pub trait RugoReadAt {
    /// Read the bytes of `range`. Results will be returned as a [`Bytes`].
    ///
    /// If the reader does not have the requested number of bytes, the read fails with
    /// [`UnexpectedEof`][std::io::ErrorKind::UnexpectedEof].
    fn read_byte_range(&self, range: Range<u64>) -> io::Result<Bytes>;

    /// Get the number of bytes of data readable.
    fn size(&self) -> io::Result<u64>;
}

impl<T: RugoReadAt + ?Sized> RugoReadAt for &T {
    fn read_byte_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        T::read_byte_range(self, range)
    }

    fn size(&self) -> io::Result<u64> {
        T::size(self)
    }
}

impl<T: RugoReadAt + ?Sized> RugoReadAt for Arc<T> {
    fn read_byte_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        T::read_byte_range(self, range)
    }

    fn size(&self) -> io::Result<u64> {
        T::size(self)
    }
}

impl RugoReadAt for Bytes {
    fn read_byte_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        let (start, end) = checked_bounds(&range)?;
        if end > self.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "range {}..{} exceeds buffer of {} bytes",
                    range.start,
                    range.end,
                    self.len()
                ),
            ));
        }
        Ok(self.slice(start..end))
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

/// Converts a `u64` range into `usize` bounds, rejecting inverted ranges.
pub(crate) fn checked_bounds(range: &Range<u64>) -> io::Result<(usize, usize)> {
    if range.start > range.end {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("inverted range {}..{}", range.start, range.end),
        ));
    }
    let start = usize::try_from(range.start).map_err(io::Error::other)?;
    let end = usize::try_from(range.end).map_err(io::Error::other)?;
    Ok((start, end))
}
