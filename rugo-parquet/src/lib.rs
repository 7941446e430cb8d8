//! Read the footer metadata of Apache Parquet files.
//!
//! A Parquet file ends with its metadata. The column data comes first, and a footer
//! serialized with the Thrift compact protocol describes the schema, the row groups and the
//! per-column chunk statistics. The file is terminated by an 8 byte trailer holding the
//! footer length and the magic bytes.
//!
//! ## Illustrated File Format
//! ```text
//! ┌────────────────────────────┐
//! │        Magic "PAR1"        │
//! ├────────────────────────────┤
//! │                            │
//! │     Column Chunk Pages     │
//! │                            │
//! ├────────────────────────────┤
//! │  Bloom Filters (optional)  │
//! ├────────────────────────────┤
//! │                            │
//! │   FileMetaData (Thrift     │
//! │   compact protocol)        │
//! │                            │
//! ├────────────────────────────┤
//! │      8-byte Trailer        │
//! │ (u32 LE footer length,     │
//! │    Magic Bytes "PAR1")     │
//! └────────────────────────────┘
//! ```
//!
//! # Reading
//!
//! [`read_metadata`] decodes the footer of a local file, and [`ParquetOpenOptions`] does the
//! same over anything implementing [`RugoReadAt`](rugo_io::RugoReadAt) with configurable
//! limits. [`read_metadata_from_footer`] decodes footer bytes the caller already holds.
//!
//! Logical types are resolved after decoding: a column takes the logical type annotated on
//! its schema path, and otherwise falls back to a default for its physical type (see
//! [`resolve_logical_types`]).
//!
//! Split-block bloom filters referenced by column chunks are probed with
//! [`test_bloom_filter`] or [`ParquetFile::might_contain`]. Probing never fails: any problem
//! reading or validating the filter answers `false`.

mod bloom;
mod model;
mod open;
mod resolve;
mod trailer;

pub use bloom::*;
pub use forever_constant::*;
pub use model::*;
pub use open::*;
pub use resolve::*;
pub use trailer::*;

/// Default bound on the size of a footer, in bytes.
pub const DEFAULT_MAX_FOOTER_SIZE: u64 = 64 << 20;

/// Constants that will never change (i.e., doing so would break compatibility with every
/// existing file)
mod forever_constant {
    /// The magic bytes for a Parquet file
    pub const MAGIC_BYTES: [u8; 4] = *b"PAR1";
    /// The magic bytes for a Parquet file with an encrypted footer
    pub const ENCRYPTED_MAGIC_BYTES: [u8; 4] = *b"PARE";
    /// The size of the trailer in bytes
    pub const EOF_SIZE: usize = 8;

}
