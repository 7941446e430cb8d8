use rugo_error::RugoResult;
use rugo_thrift::{CompactReader, ReadThrift, ThriftType};

use crate::ColumnStatistics;
use crate::model::skip_field;

/// A horizontal slice of the table, with one column chunk per leaf column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowGroup {
    pub num_rows: i64,
    pub total_byte_size: i64,
    /// Column chunks in on-disk order.
    pub columns: Vec<ColumnStatistics>,
    pub file_offset: Option<i64>,
    pub total_compressed_size: Option<i64>,
    pub ordinal: Option<i16>,
}

impl RowGroup {
    /// Find the column chunk with the given dot-joined name.
    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl ReadThrift for RowGroup {
    fn read_thrift(reader: &mut CompactReader) -> RugoResult<Self> {
        let mut row_group = RowGroup::default();
        reader.read_struct(|reader, field| {
            match (field.id, field.ty) {
                (1, ThriftType::List) => {
                    reader.read_list(|reader, ty| {
                        if ty == ThriftType::Struct {
                            row_group
                                .columns
                                .push(ColumnStatistics::read_thrift(reader)?);
                            Ok(())
                        } else {
                            reader.skip_element(ty)
                        }
                    })?;
                }
                (2, ThriftType::I64) => row_group.total_byte_size = reader.read_i64()?,
                (3, ThriftType::I64) => row_group.num_rows = reader.read_i64()?,
                (5, ThriftType::I64) => row_group.file_offset = Some(reader.read_i64()?),
                (6, ThriftType::I64) => {
                    row_group.total_compressed_size = Some(reader.read_i64()?);
                }
                (7, ThriftType::I16) => row_group.ordinal = Some(reader.read_i16()?),
                _ => skip_field(reader, "RowGroup", field)?,
            }
            Ok(())
        })?;
        Ok(row_group)
    }
}

#[cfg(test)]
mod tests {
    use rugo_thrift::CompactWriter;

    use super::*;

    #[test]
    fn columns_keep_on_disk_order() {
        let mut writer = CompactWriter::new();
        writer.write_field_header(1, ThriftType::List);
        writer.write_list_header(ThriftType::Struct, 3);
        for name in ["z", "a", "m"] {
            writer.begin_struct();
            writer.begin_struct_field(3);
            writer.write_field_header(3, ThriftType::List);
            writer.write_list_header(ThriftType::Binary, 1);
            writer.write_binary(name.as_bytes());
            writer.end_struct();
            writer.end_struct();
        }
        writer.write_i64_field(2, 4096);
        writer.write_i64_field(3, 12);
        // sorting_columns
        writer.write_field_header(4, ThriftType::List);
        writer.write_list_header(ThriftType::Struct, 0);
        writer.write_i64_field(5, 4);
        writer.write_i64_field(6, 2048);
        writer.write_field_header(7, ThriftType::I16);
        writer.write_zigzag(3);
        writer.end_struct();

        let row_group = RowGroup::read_thrift_bytes(writer.finish()).unwrap();
        let names: Vec<_> = row_group.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
        assert_eq!(row_group.total_byte_size, 4096);
        assert_eq!(row_group.num_rows, 12);
        assert_eq!(row_group.file_offset, Some(4));
        assert_eq!(row_group.total_compressed_size, Some(2048));
        assert_eq!(row_group.ordinal, Some(3));
        assert!(row_group.column("a").is_some());
        assert!(row_group.column("b").is_none());
    }
}
