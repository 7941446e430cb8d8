use std::io;
use std::ops::Range;

use bytes::Bytes;

use crate::RugoReadAt;

/// An adapter that offsets all reads by a fixed amount.
///
/// Useful when a file is embedded at a known position inside a larger blob: the adapter
/// exposes only the bytes from `offset` onwards, so trailer-relative logic works unchanged.
pub struct OffsetReadAt<R> {
    read: R,
    offset: u64,
}

impl<R> Clone for OffsetReadAt<R>
where
    R: Clone,
{
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            offset: self.offset,
        }
    }
}

impl<R: RugoReadAt> OffsetReadAt<R> {
    pub fn new(read: R, offset: u64) -> Self {
        Self { read, offset }
    }
}

impl<R: RugoReadAt> RugoReadAt for OffsetReadAt<R> {
    fn read_byte_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        let start = range.start.checked_add(self.offset);
        let end = range.end.checked_add(self.offset);
        match (start, end) {
            (Some(start), Some(end)) => self.read.read_byte_range(start..end),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "offset range overflows u64",
            )),
        }
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.read.size()?.saturating_sub(self.offset))
    }
}
