use std::path::Path;

use bytes::Bytes;
use log::debug;
use rugo_error::{RugoResult, rugo_bail};
use rugo_io::{LocalFile, RugoReadAt};
use rugo_thrift::{CompactReader, DEFAULT_MAX_DEPTH, ReadThrift};

use crate::{
    BloomFilterOptions, DEFAULT_MAX_FOOTER_SIZE, FileMetadata, MAGIC_BYTES, locate_footer,
    probe_bloom_filter, resolve_logical_types,
};

/// Open options for a Parquet file reader.
#[derive(Debug, Clone)]
pub struct ParquetOpenOptions<R> {
    /// The underlying file reader.
    read: R,
    /// An optional, externally provided, file size.
    file_size: Option<u64>,
    max_footer_size: u64,
    leading_magic_check: bool,
    max_nesting_depth: usize,
    bloom_filter_options: BloomFilterOptions,
}

impl ParquetOpenOptions<LocalFile> {
    /// Open a local file for reading.
    ///
    /// The file handle is closed when the returned options, or the [`ParquetFile`] opened
    /// from them, are dropped.
    pub fn file(path: impl AsRef<Path>) -> RugoResult<Self> {
        Ok(Self::new(LocalFile::open(path)?))
    }
}

impl ParquetOpenOptions<Bytes> {
    /// Open an in-memory file contained in the provided buffer.
    pub fn in_memory<B: Into<Bytes>>(buffer: B) -> Self {
        Self::new(buffer.into())
    }
}

impl<R: RugoReadAt> ParquetOpenOptions<R> {
    pub fn new(read: R) -> Self {
        Self {
            read,
            file_size: None,
            max_footer_size: DEFAULT_MAX_FOOTER_SIZE,
            leading_magic_check: false,
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            bloom_filter_options: BloomFilterOptions::default(),
        }
    }

    /// Configure a known file size.
    ///
    /// This saves the I/O request that would otherwise discover the size of the file.
    /// Of course, all bets are off if you pass an incorrect value.
    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = Some(file_size);
        self
    }

    /// Configure the largest footer the reader will load.
    pub fn with_max_footer_size(mut self, max_footer_size: u64) -> RugoResult<Self> {
        if max_footer_size == 0 {
            rugo_bail!(InvalidArgument: "max_footer_size must be at least 1");
        }
        self.max_footer_size = max_footer_size;
        Ok(self)
    }

    /// Also require the file to start with the magic bytes.
    pub fn with_leading_magic_check(mut self, leading_magic_check: bool) -> Self {
        self.leading_magic_check = leading_magic_check;
        self
    }

    /// Configure how deeply structs, containers and schema groups may nest.
    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> RugoResult<Self> {
        if max_nesting_depth == 0 {
            rugo_bail!(InvalidArgument: "max_nesting_depth must be at least 1");
        }
        self.max_nesting_depth = max_nesting_depth;
        Ok(self)
    }

    /// Configure the bounds used when probing bloom filters of the opened file.
    pub fn with_bloom_filter_options(mut self, bloom_filter_options: BloomFilterOptions) -> Self {
        self.bloom_filter_options = bloom_filter_options;
        self
    }

    /// Read and decode the footer, keeping the reader for bloom filter probes.
    pub fn open(self) -> RugoResult<ParquetFile<R>> {
        let footer = self.read_footer()?;
        let metadata = decode_footer(footer, self.max_nesting_depth)?;
        Ok(ParquetFile {
            read: self.read,
            metadata,
            bloom_filter_options: self.bloom_filter_options,
        })
    }

    /// Read and decode the footer, releasing the reader.
    pub fn read_metadata(self) -> RugoResult<FileMetadata> {
        Ok(self.open()?.into_metadata())
    }

    fn read_footer(&self) -> RugoResult<Bytes> {
        let file_size = match self.file_size {
            None => self.read.size()?,
            Some(file_size) => file_size,
        };

        let footer = locate_footer(&self.read, file_size)?;
        let footer_len = footer.end - footer.start;
        if footer_len > self.max_footer_size {
            rugo_bail!(
                InvalidLength: "footer of {} bytes exceeds the maximum of {}",
                footer_len,
                self.max_footer_size
            );
        }

        if self.leading_magic_check {
            let magic_len = MAGIC_BYTES.len() as u64;
            if footer.start < magic_len {
                rugo_bail!(
                    InvalidLength: "footer starting at {} overlaps the leading magic bytes",
                    footer.start
                );
            }
            let magic = self.read.read_byte_range(0..magic_len)?;
            if magic[..] != MAGIC_BYTES {
                rugo_bail!(NotThisFormat: "invalid leading magic bytes, got {:?}", &magic[..]);
            }
        }

        Ok(self.read.read_byte_range(footer)?)
    }
}

/// A Parquet file whose footer has been decoded.
#[derive(Debug, Clone)]
pub struct ParquetFile<R> {
    read: R,
    metadata: FileMetadata,
    bloom_filter_options: BloomFilterOptions,
}

impl<R: RugoReadAt> ParquetFile<R> {
    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> FileMetadata {
        self.metadata
    }

    /// Probe the bloom filter of `column` in every row group.
    ///
    /// Entries are `None` for row groups whose chunk of `column` has no bloom filter, or which
    /// have no such column.
    pub fn might_contain(&self, column: &str, value: impl AsRef<[u8]>) -> Vec<Option<bool>> {
        let value = value.as_ref();
        self.metadata
            .row_groups
            .iter()
            .map(|row_group| {
                let chunk = row_group.column(column)?;
                let offset = chunk.bloom_filter_offset?;
                Some(self.test_bloom_filter(offset, chunk.bloom_filter_length, value))
            })
            .collect()
    }

    /// Probe the bloom filter stored at `offset`, see [`probe_bloom_filter`].
    pub fn test_bloom_filter(
        &self,
        offset: u64,
        length: Option<u64>,
        value: impl AsRef<[u8]>,
    ) -> bool {
        probe_bloom_filter(&self.read, offset, length, value, &self.bloom_filter_options)
    }
}

/// Decode serialized footer bytes and resolve column logical types.
pub fn decode_footer(footer: Bytes, max_nesting_depth: usize) -> RugoResult<FileMetadata> {
    let footer_len = footer.len();
    let mut reader = CompactReader::with_max_depth(footer, max_nesting_depth);
    let mut metadata = FileMetadata::read_thrift(&mut reader)?;
    if !reader.cursor().is_empty() {
        debug!(
            "ignoring {} bytes after the end of the {} byte footer",
            reader.cursor().remaining(),
            footer_len
        );
    }
    resolve_logical_types(&mut metadata);
    Ok(metadata)
}

/// Read the metadata of the Parquet file at `path`.
pub fn read_metadata(path: impl AsRef<Path>) -> RugoResult<FileMetadata> {
    ParquetOpenOptions::file(path)?.read_metadata()
}

/// Decode footer bytes, without the trailer, that were read by other means.
pub fn read_metadata_from_footer(footer: impl Into<Bytes>) -> RugoResult<FileMetadata> {
    decode_footer(footer.into(), DEFAULT_MAX_DEPTH)
}

/// Read the metadata of a complete Parquet file held in memory.
pub fn read_metadata_from_bytes(file: impl Into<Bytes>) -> RugoResult<FileMetadata> {
    ParquetOpenOptions::in_memory(file).read_metadata()
}

/// Probe the bloom filter stored at `offset` in the file at `path`.
///
/// Returns `false` when the value is definitely absent, and also when the file or the
/// filter cannot be read.
pub fn test_bloom_filter(
    path: impl AsRef<Path>,
    offset: u64,
    length: Option<u64>,
    value: impl AsRef<[u8]>,
) -> bool {
    match LocalFile::open(path) {
        Ok(file) => probe_bloom_filter(
            &file,
            offset,
            length,
            value,
            &BloomFilterOptions::default(),
        ),
        Err(err) => {
            debug!("treating bloom filter as a miss: {err}");
            false
        }
    }
}
