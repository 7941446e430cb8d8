use std::collections::BTreeMap;

use log::debug;
use rugo_error::RugoResult;
use rugo_thrift::{CompactReader, ReadThrift, ThriftType};

use crate::model::skip_field;
use crate::{LogicalType, RowGroup, SchemaNode};

/// An application-defined key/value pair stored in the footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl ReadThrift for KeyValue {
    fn read_thrift(reader: &mut CompactReader) -> RugoResult<Self> {
        let mut key_value = KeyValue::default();
        reader.read_struct(|reader, field| {
            match (field.id, field.ty) {
                (1, ThriftType::Binary) => key_value.key = reader.read_string()?,
                (2, ThriftType::Binary) => key_value.value = Some(reader.read_string()?),
                _ => skip_field(reader, "KeyValue", field)?,
            }
            Ok(())
        })?;
        Ok(key_value)
    }
}

/// The decoded footer of a Parquet file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileMetadata {
    pub version: Option<i32>,
    pub num_rows: i64,
    pub created_by: Option<String>,
    pub key_value_metadata: Vec<KeyValue>,
    pub schema: Option<SchemaNode>,
    pub row_groups: Vec<RowGroup>,
    /// Logical types annotated in the schema, keyed by dot-joined column path.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub logical_types: BTreeMap<String, LogicalType>,
}

impl FileMetadata {
    /// The total number of column chunks across all row groups.
    pub fn num_column_chunks(&self) -> usize {
        self.row_groups.iter().map(|rg| rg.columns.len()).sum()
    }

    /// Look up a key in the key/value metadata. Later entries win.
    pub fn key_value(&self, key: &str) -> Option<&str> {
        self.key_value_metadata
            .iter()
            .rev()
            .find(|kv| kv.key == key)
            .and_then(|kv| kv.value.as_deref())
    }
}

impl ReadThrift for FileMetadata {
    /// Decode a `FileMetaData` struct and rebuild its schema tree.
    ///
    /// Columns are not yet annotated with their logical types, see
    /// [`resolve_logical_types`](crate::resolve_logical_types).
    fn read_thrift(reader: &mut CompactReader) -> RugoResult<Self> {
        let mut metadata = FileMetadata::default();
        let mut elements = Vec::new();
        reader.read_struct(|reader, field| {
            match (field.id, field.ty) {
                (1, ThriftType::I32) => metadata.version = Some(reader.read_i32()?),
                (2, ThriftType::List) => elements = read_struct_list(reader)?,
                (3, ThriftType::I64) => metadata.num_rows = reader.read_i64()?,
                (4, ThriftType::List) => metadata.row_groups = read_struct_list(reader)?,
                (5, ThriftType::List) => metadata.key_value_metadata = read_struct_list(reader)?,
                (6, ThriftType::Binary) => metadata.created_by = Some(reader.read_string()?),
                _ => skip_field(reader, "FileMetaData", field)?,
            }
            Ok(())
        })?;

        let num_elements = elements.len();
        metadata.schema = SchemaNode::try_from_elements(elements, reader.max_depth())?;
        metadata.logical_types = metadata
            .schema
            .as_ref()
            .map(SchemaNode::logical_types)
            .unwrap_or_default();
        debug!(
            "decoded footer with {} schema elements, {} row groups and {} rows",
            num_elements,
            metadata.row_groups.len(),
            metadata.num_rows
        );
        Ok(metadata)
    }
}

/// Decode a list of structs, skipping elements of any other type.
fn read_struct_list<T: ReadThrift>(reader: &mut CompactReader) -> RugoResult<Vec<T>> {
    let mut values = Vec::new();
    reader.read_list(|reader, ty| {
        if ty == ThriftType::Struct {
            values.push(T::read_thrift(reader)?);
            Ok(())
        } else {
            reader.skip_element(ty)
        }
    })?;
    Ok(values)
}
