use bytes::Bytes;
use itertools::Itertools;
use rugo_error::RugoResult;
use rugo_thrift::{CompactReader, ReadThrift, ThriftType};

use crate::model::{read_string_list, skip_field};
use crate::{CompressionCodec, Encoding, LogicalType, PhysicalType};

/// The metadata and statistics of one column chunk within a row group.
///
/// Every `ColumnChunk` in the footer yields exactly one `ColumnStatistics`, even when the chunk
/// carries no embedded metadata (in which case the name is empty and everything else is
/// absent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnStatistics {
    /// The dot-joined path of the column in the schema.
    pub name: String,
    /// The path of the column in the schema, one entry per nesting level.
    pub path: Vec<String>,
    pub physical_type: Option<PhysicalType>,
    /// Assigned after decoding, see [`resolve_logical_types`](crate::resolve_logical_types).
    pub logical_type: Option<LogicalType>,
    /// The plain-encoded minimum value.
    pub min: Option<Bytes>,
    /// The plain-encoded maximum value.
    pub max: Option<Bytes>,
    pub null_count: Option<u64>,
    pub distinct_count: Option<u64>,
    pub is_min_exact: Option<bool>,
    pub is_max_exact: Option<bool>,
    pub bloom_filter_offset: Option<u64>,
    /// The length of the bloom filter, when the writer recorded it.
    pub bloom_filter_length: Option<u64>,
    pub codec: Option<CompressionCodec>,
    pub encodings: Vec<Encoding>,
    pub num_values: Option<i64>,
    pub total_uncompressed_size: Option<i64>,
    pub total_compressed_size: Option<i64>,
    pub data_page_offset: Option<i64>,
    pub dictionary_page_offset: Option<i64>,
    /// The file holding the chunk's data, when it is not the file containing the footer.
    pub file_path: Option<String>,
}

impl ColumnStatistics {
    /// Whether the chunk references a bloom filter.
    pub fn has_bloom_filter(&self) -> bool {
        self.bloom_filter_offset.is_some()
    }
}

impl ReadThrift for ColumnStatistics {
    /// Decode a `ColumnChunk` struct.
    fn read_thrift(reader: &mut CompactReader) -> RugoResult<Self> {
        let mut column = ColumnStatistics::default();
        reader.read_struct(|reader, field| {
            match (field.id, field.ty) {
                (1, ThriftType::Binary) => column.file_path = Some(reader.read_string()?),
                (3, ThriftType::Struct) => read_column_metadata(reader, &mut column)?,
                _ => skip_field(reader, "ColumnChunk", field)?,
            }
            Ok(())
        })?;
        Ok(column)
    }
}

fn read_column_metadata(reader: &mut CompactReader, column: &mut ColumnStatistics) -> RugoResult<()> {
    reader.read_struct(|reader, field| {
        match (field.id, field.ty) {
            (1, ThriftType::I32) => column.physical_type = Some(reader.read_i32()?.into()),
            (2, ThriftType::List | ThriftType::Set) => {
                reader.read_list(|reader, ty| {
                    if ty == ThriftType::I32 {
                        column.encodings.push(reader.read_i32()?.into());
                        Ok(())
                    } else {
                        reader.skip_element(ty)
                    }
                })?;
            }
            (3, ThriftType::List) => {
                column.path = read_string_list(reader)?;
                column.name = column.path.iter().join(".");
            }
            (4, ThriftType::I32) => column.codec = Some(reader.read_i32()?.into()),
            (5, ThriftType::I64) => column.num_values = Some(reader.read_i64()?),
            (6, ThriftType::I64) => column.total_uncompressed_size = Some(reader.read_i64()?),
            (7, ThriftType::I64) => column.total_compressed_size = Some(reader.read_i64()?),
            (9, ThriftType::I64) => column.data_page_offset = Some(reader.read_i64()?),
            (11, ThriftType::I64) => column.dictionary_page_offset = Some(reader.read_i64()?),
            (12, ThriftType::Struct) => read_statistics(reader, column)?,
            (14, ThriftType::I64) => {
                column.bloom_filter_offset = u64::try_from(reader.read_i64()?).ok();
            }
            (15, ThriftType::I32) => {
                column.bloom_filter_length = u64::try_from(reader.read_i32()?).ok();
            }
            // 8 is the chunk's key/value metadata, 10 the index page offset
            _ => skip_field(reader, "ColumnMetaData", field)?,
        }
        Ok(())
    })
}

fn read_statistics(reader: &mut CompactReader, column: &mut ColumnStatistics) -> RugoResult<()> {
    let mut legacy_max = None;
    let mut legacy_min = None;
    let mut max_value = None;
    let mut min_value = None;
    reader.read_struct(|reader, field| {
        match (field.id, field.ty) {
            (1, ThriftType::Binary) => legacy_max = Some(reader.read_binary()?),
            (2, ThriftType::Binary) => legacy_min = Some(reader.read_binary()?),
            (3, ThriftType::I64) => column.null_count = u64::try_from(reader.read_i64()?).ok(),
            (4, ThriftType::I64) => {
                column.distinct_count = u64::try_from(reader.read_i64()?).ok();
            }
            (5, ThriftType::Binary) => max_value = Some(reader.read_binary()?),
            (6, ThriftType::Binary) => min_value = Some(reader.read_binary()?),
            (7, ThriftType::BoolTrue | ThriftType::BoolFalse) => {
                column.is_max_exact = field.bool_value();
            }
            (8, ThriftType::BoolTrue | ThriftType::BoolFalse) => {
                column.is_min_exact = field.bool_value();
            }
            _ => skip_field(reader, "Statistics", field)?,
        }
        Ok(())
    })?;
    column.min = prefer_unambiguous(min_value, legacy_min);
    column.max = prefer_unambiguous(max_value, legacy_max);
    Ok(())
}

/// `min_value`/`max_value` have well-defined sort orders, so they win over the deprecated
/// `min`/`max` unless they are empty.
fn prefer_unambiguous(value: Option<Bytes>, legacy: Option<Bytes>) -> Option<Bytes> {
    match (value, legacy) {
        (Some(value), _) if !value.is_empty() => Some(value),
        (_, Some(legacy)) => Some(legacy),
        (value, None) => value,
    }
}
