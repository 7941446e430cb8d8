use crate::{ColumnStatistics, FileMetadata, LogicalType, PhysicalType, TimeUnit};

/// Annotate every column chunk with its logical type.
///
/// A column takes the logical type of the schema node at its path. Columns without one fall
/// back by physical type: `BYTE_ARRAY` is read as a string and `INT96` as a nanosecond
/// timestamp. Other physical types stay without a logical type.
pub fn resolve_logical_types(metadata: &mut FileMetadata) {
    let FileMetadata {
        row_groups,
        logical_types,
        ..
    } = metadata;
    for column in row_groups.iter_mut().flat_map(|rg| rg.columns.iter_mut()) {
        column.logical_type = logical_types
            .get(&column.name)
            .copied()
            .or_else(|| inferred_logical_type(column));
    }
}

fn inferred_logical_type(column: &ColumnStatistics) -> Option<LogicalType> {
    match column.physical_type? {
        PhysicalType::ByteArray => Some(LogicalType::String),
        PhysicalType::Int96 => Some(LogicalType::timestamp(TimeUnit::Nanos)),
        _ => None,
    }
}
