use std::fmt::{Display, Formatter};

use log::trace;
use rugo_error::RugoResult;
use rugo_thrift::{CompactReader, ThriftType};

use crate::model::skip_field;

/// The resolution of a time or timestamp annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TimeUnit {
    Millis,
    Micros,
    Nanos,
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millis => write!(f, "MILLIS"),
            Self::Micros => write!(f, "MICROS"),
            Self::Nanos => write!(f, "NANOS"),
        }
    }
}

/// How the bytes of a physical type should be interpreted.
///
/// Both the `LogicalType` union of newer writers and the legacy [`ConvertedType`](crate::ConvertedType)
/// annotations decode into this type. `MapKeyValue` and `Interval` only exist as converted
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "type")
)]
pub enum LogicalType {
    String,
    Map,
    MapKeyValue,
    List,
    Enum,
    Decimal {
        scale: i32,
        precision: i32,
    },
    Date,
    Time {
        unit: TimeUnit,
        is_adjusted_to_utc: bool,
    },
    Timestamp {
        unit: TimeUnit,
        is_adjusted_to_utc: bool,
    },
    Integer {
        bit_width: i8,
        is_signed: bool,
    },
    Unknown,
    Json,
    Bson,
    Uuid,
    Float16,
    Interval,
}

impl LogicalType {
    pub fn integer(bit_width: i8, is_signed: bool) -> Self {
        Self::Integer {
            bit_width,
            is_signed,
        }
    }

    pub fn timestamp(unit: TimeUnit) -> Self {
        Self::Timestamp {
            unit,
            is_adjusted_to_utc: false,
        }
    }
}

impl Display for LogicalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "STRING"),
            Self::Map => write!(f, "MAP"),
            Self::MapKeyValue => write!(f, "MAP_KEY_VALUE"),
            Self::List => write!(f, "LIST"),
            Self::Enum => write!(f, "ENUM"),
            Self::Decimal { scale, precision } => write!(f, "DECIMAL({precision},{scale})"),
            Self::Date => write!(f, "DATE"),
            Self::Time { unit, .. } => write!(f, "TIME_{unit}"),
            Self::Timestamp { unit, .. } => write!(f, "TIMESTAMP_{unit}"),
            Self::Integer {
                bit_width,
                is_signed: true,
            } => write!(f, "INT{bit_width}"),
            Self::Integer {
                bit_width,
                is_signed: false,
            } => write!(f, "UINT{bit_width}"),
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Json => write!(f, "JSON"),
            Self::Bson => write!(f, "BSON"),
            Self::Uuid => write!(f, "UUID"),
            Self::Float16 => write!(f, "FLOAT16"),
            Self::Interval => write!(f, "INTERVAL"),
        }
    }
}

/// Decode a `LogicalType` union.
///
/// The union is a struct with a single set field whose id selects the variant. Variants this
/// reader does not know, and variants whose payload cannot be understood, yield `None`.
pub(crate) fn read_logical_type(reader: &mut CompactReader) -> RugoResult<Option<LogicalType>> {
    let mut logical = None;
    reader.read_struct(|reader, field| {
        if field.ty == ThriftType::Struct {
            logical = read_logical_variant(reader, field.id)?;
            Ok(())
        } else {
            skip_field(reader, "LogicalType", field)
        }
    })?;
    Ok(logical)
}

fn read_logical_variant(reader: &mut CompactReader, id: i16) -> RugoResult<Option<LogicalType>> {
    let logical = match id {
        1 => LogicalType::String,
        2 => LogicalType::Map,
        3 => LogicalType::List,
        4 => LogicalType::Enum,
        5 => return read_decimal(reader).map(Some),
        6 => LogicalType::Date,
        7 => {
            return Ok(read_temporal(reader)?
                .map(|(unit, is_adjusted_to_utc)| LogicalType::Time {
                    unit,
                    is_adjusted_to_utc,
                }));
        }
        8 => {
            return Ok(read_temporal(reader)?
                .map(|(unit, is_adjusted_to_utc)| LogicalType::Timestamp {
                    unit,
                    is_adjusted_to_utc,
                }));
        }
        10 => return read_integer(reader).map(Some),
        11 => LogicalType::Unknown,
        12 => LogicalType::Json,
        13 => LogicalType::Bson,
        14 => LogicalType::Uuid,
        15 => LogicalType::Float16,
        _ => {
            trace!("skipping unsupported logical type {id}");
            reader.skip(ThriftType::Struct)?;
            return Ok(None);
        }
    };
    // The remaining variants are empty structs.
    reader.skip(ThriftType::Struct)?;
    Ok(Some(logical))
}

fn read_decimal(reader: &mut CompactReader) -> RugoResult<LogicalType> {
    let mut scale = 0;
    let mut precision = 0;
    reader.read_struct(|reader, field| {
        match (field.id, field.ty) {
            (1, ThriftType::I32) => scale = reader.read_i32()?,
            (2, ThriftType::I32) => precision = reader.read_i32()?,
            _ => skip_field(reader, "DecimalType", field)?,
        }
        Ok(())
    })?;
    Ok(LogicalType::Decimal { scale, precision })
}

/// Decode the shared payload of `TimeType` and `TimestampType`.
fn read_temporal(reader: &mut CompactReader) -> RugoResult<Option<(TimeUnit, bool)>> {
    let mut is_adjusted_to_utc = false;
    let mut unit = None;
    reader.read_struct(|reader, field| {
        match (field.id, field.ty) {
            (1, ThriftType::BoolTrue | ThriftType::BoolFalse) => {
                is_adjusted_to_utc = field.bool_value().unwrap_or_default();
            }
            (2, ThriftType::Struct) => unit = read_time_unit(reader)?,
            _ => skip_field(reader, "TimeType", field)?,
        }
        Ok(())
    })?;
    Ok(unit.map(|unit| (unit, is_adjusted_to_utc)))
}

fn read_time_unit(reader: &mut CompactReader) -> RugoResult<Option<TimeUnit>> {
    let mut unit = None;
    reader.read_struct(|reader, field| {
        match (field.id, field.ty) {
            (1, ThriftType::Struct) => unit = Some(TimeUnit::Millis),
            (2, ThriftType::Struct) => unit = Some(TimeUnit::Micros),
            (3, ThriftType::Struct) => unit = Some(TimeUnit::Nanos),
            _ => unit = None,
        }
        reader.skip(field.ty)
    })?;
    Ok(unit)
}

fn read_integer(reader: &mut CompactReader) -> RugoResult<LogicalType> {
    let mut bit_width = 0;
    let mut is_signed = false;
    reader.read_struct(|reader, field| {
        match (field.id, field.ty) {
            (1, ThriftType::Byte) => bit_width = reader.read_byte()?,
            (2, ThriftType::BoolTrue | ThriftType::BoolFalse) => {
                is_signed = field.bool_value().unwrap_or_default();
            }
            _ => skip_field(reader, "IntType", field)?,
        }
        Ok(())
    })?;
    Ok(LogicalType::integer(bit_width, is_signed))
}
