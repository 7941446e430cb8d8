//! Decoding of the Thrift Compact Protocol.
//!
//! The compact protocol is self-describing: every struct field is prefixed by a one-byte
//! header carrying its wire type and a delta from the previous field id, and every container
//! declares its element types. That is enough to walk (or skip) any value without a schema,
//! which is what lets callers decode only the fields they model and step over the rest.
//!
//! All reads go through a [`ByteCursor`], which fails with
//! [`UnexpectedEndOfInput`](rugo_error::RugoError::UnexpectedEndOfInput) or
//! [`InvalidLength`](rugo_error::RugoError::InvalidLength) rather than read past its buffer.

pub use cursor::*;
pub use read_thrift::*;
pub use reader::*;
pub use types::*;
#[cfg(any(test, feature = "test-harness"))]
pub use writer::*;

mod cursor;
mod read_thrift;
mod reader;
mod types;
#[cfg(any(test, feature = "test-harness"))]
mod writer;
