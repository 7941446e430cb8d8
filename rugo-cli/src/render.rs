use std::fmt::Display;
use std::io::{self, Write};

use itertools::Itertools;
use rugo::{ColumnStatistics, FileMetadata, PhysicalType};

/// Write the plain-text report of a file's row groups and columns.
pub fn write_report(out: &mut impl Write, metadata: &FileMetadata) -> io::Result<()> {
    writeln!(out, "Num rows: {}", metadata.num_rows)?;
    if let Some(created_by) = &metadata.created_by {
        writeln!(out, "Created by: {created_by}")?;
    }
    for (i, row_group) in metadata.row_groups.iter().enumerate() {
        writeln!(
            out,
            " RowGroup {i} rows={} bytes={} cols={}",
            row_group.num_rows,
            row_group.total_byte_size,
            row_group.columns.len()
        )?;
        for (j, column) in row_group.columns.iter().enumerate() {
            write_column(out, j, column)?;
        }
    }
    Ok(())
}

fn write_column(out: &mut impl Write, index: usize, column: &ColumnStatistics) -> io::Result<()> {
    let stat = |value: Option<&[u8]>| {
        value.map_or_else(
            || "-".to_string(),
            |v| format_stat_value(column.physical_type, v),
        )
    };
    writeln!(
        out,
        "  Column {index} name={} type={} logical={} min={} max={} nulls={} bloom_offset={} bloom_length={}",
        column.name,
        or_dash(column.physical_type),
        or_dash(column.logical_type),
        stat(column.min.as_deref()),
        stat(column.max.as_deref()),
        or_dash(column.null_count),
        or_dash(column.bloom_filter_offset),
        or_dash(column.bloom_filter_length),
    )
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render a plain-encoded statistic.
///
/// Values of the fixed-width numeric types are decoded when their length matches. Anything
/// else is printed verbatim if it is printable ASCII, and as lowercase hex otherwise.
pub fn format_stat_value(physical_type: Option<PhysicalType>, value: &[u8]) -> String {
    if let Some(number) = physical_type.and_then(|ty| format_number(ty, value)) {
        return number;
    }
    if value.iter().all(|b| (0x20..=0x7E).contains(b)) {
        String::from_utf8_lossy(value).into_owned()
    } else {
        format!("0x{}", value.iter().map(|b| format!("{b:02x}")).join(""))
    }
}

fn format_number(physical_type: PhysicalType, value: &[u8]) -> Option<String> {
    if physical_type.value_width()? != value.len() {
        return None;
    }
    let number = match physical_type {
        PhysicalType::Int32 => i32::from_le_bytes(value.try_into().ok()?).to_string(),
        PhysicalType::Int64 => i64::from_le_bytes(value.try_into().ok()?).to_string(),
        PhysicalType::Float => f32::from_le_bytes(value.try_into().ok()?).to_string(),
        PhysicalType::Double => f64::from_le_bytes(value.try_into().ok()?).to_string(),
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use rstest::rstest;
    use rugo::{LogicalType, RowGroup};

    use super::*;

    #[rstest]
    #[case(Some(PhysicalType::Int32), &(-7i32).to_le_bytes(), "-7")]
    #[case(Some(PhysicalType::Int64), &1_000_000_000_000i64.to_le_bytes(), "1000000000000")]
    #[case(Some(PhysicalType::Float), &1.5f32.to_le_bytes(), "1.5")]
    #[case(Some(PhysicalType::Double), &(-0.25f64).to_le_bytes(), "-0.25")]
    #[case(Some(PhysicalType::ByteArray), b"hello world", "hello world")]
    #[case(Some(PhysicalType::ByteArray), b"\x00\xff", "0x00ff")]
    #[case(Some(PhysicalType::Int32), b"abcdefgh", "abcdefgh")]
    #[case(Some(PhysicalType::Int64), &[1, 2, 3, 0x80], "0x01020380")]
    #[case(Some(PhysicalType::FixedLenByteArray), &[0xAB, 0xCD], "0xabcd")]
    #[case(Some(PhysicalType::Boolean), &[1], "0x01")]
    #[case(None, b"~ ok", "~ ok")]
    #[case(None, b"", "")]
    fn stat_values(
        #[case] physical_type: Option<PhysicalType>,
        #[case] value: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(format_stat_value(physical_type, value), expected);
    }

    #[test]
    fn report() {
        let metadata = FileMetadata {
            num_rows: 3,
            row_groups: vec![RowGroup {
                num_rows: 3,
                total_byte_size: 120,
                columns: vec![
                    ColumnStatistics {
                        name: "a.b".to_string(),
                        physical_type: Some(PhysicalType::Int32),
                        logical_type: Some(LogicalType::Date),
                        min: Some(Bytes::copy_from_slice(&1i32.to_le_bytes())),
                        max: Some(Bytes::copy_from_slice(&9i32.to_le_bytes())),
                        null_count: Some(0),
                        bloom_filter_offset: Some(4),
                        ..Default::default()
                    },
                    ColumnStatistics {
                        name: "c".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut out = Vec::new();
        write_report(&mut out, &metadata).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Num rows: 3\n RowGroup 0 rows=3 bytes=120 cols=2\n  Column 0 name=a.b type=INT32 \
             logical=DATE min=1 max=9 nulls=0 bloom_offset=4 bloom_length=-\n  Column 1 \
             name=c type=- logical=- min=- max=- nulls=- bloom_offset=- bloom_length=-\n"
        );
    }
}
