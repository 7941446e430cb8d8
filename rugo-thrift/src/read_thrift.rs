use bytes::Bytes;
use rugo_error::RugoResult;

use crate::CompactReader;

/// A type that can be decoded from a compact protocol struct.
pub trait ReadThrift: Sized {
    /// Decode `Self` from the reader, consuming the struct up to and including its STOP marker.
    fn read_thrift(reader: &mut CompactReader) -> RugoResult<Self>;

    /// Decode `Self` from a buffer holding exactly one serialized struct.
    fn read_thrift_bytes(bytes: impl Into<Bytes>) -> RugoResult<Self> {
        Self::read_thrift(&mut CompactReader::new(bytes))
    }
}
