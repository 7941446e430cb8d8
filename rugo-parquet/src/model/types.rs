use std::fmt::{Display, Formatter};

use num_enum::{FromPrimitive, IntoPrimitive};

use crate::{LogicalType, TimeUnit};

/// The physical storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(i32)]
pub enum PhysicalType {
    Boolean = 0,
    Int32 = 1,
    Int64 = 2,
    Int96 = 3,
    Float = 4,
    Double = 5,
    ByteArray = 6,
    FixedLenByteArray = 7,
    #[num_enum(catch_all)]
    Unknown(i32),
}

impl PhysicalType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Int96 => "INT96",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::ByteArray => "BYTE_ARRAY",
            Self::FixedLenByteArray => "FIXED_LEN_BYTE_ARRAY",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// The byte width of a plain-encoded statistic, for the fixed-width numeric types.
    pub fn value_width(&self) -> Option<usize> {
        match self {
            Self::Int32 | Self::Float => Some(4),
            Self::Int64 | Self::Double => Some(8),
            _ => None,
        }
    }
}

impl Display for PhysicalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How often a field may occur within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(i32)]
pub enum Repetition {
    Required = 0,
    Optional = 1,
    Repeated = 2,
    #[num_enum(catch_all)]
    Unknown(i32),
}

impl Display for Repetition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "REQUIRED"),
            Self::Optional => write!(f, "OPTIONAL"),
            Self::Repeated => write!(f, "REPEATED"),
            Self::Unknown(v) => write!(f, "UNKNOWN({v})"),
        }
    }
}

/// The compression codec of a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(i32)]
pub enum CompressionCodec {
    Uncompressed = 0,
    Snappy = 1,
    Gzip = 2,
    Lzo = 3,
    Brotli = 4,
    Lz4 = 5,
    Zstd = 6,
    Lz4Raw = 7,
    #[num_enum(catch_all)]
    Unknown(i32),
}

impl Display for CompressionCodec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uncompressed => write!(f, "UNCOMPRESSED"),
            Self::Snappy => write!(f, "SNAPPY"),
            Self::Gzip => write!(f, "GZIP"),
            Self::Lzo => write!(f, "LZO"),
            Self::Brotli => write!(f, "BROTLI"),
            Self::Lz4 => write!(f, "LZ4"),
            Self::Zstd => write!(f, "ZSTD"),
            Self::Lz4Raw => write!(f, "LZ4_RAW"),
            Self::Unknown(v) => write!(f, "UNKNOWN({v})"),
        }
    }
}

/// A page encoding used somewhere in a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(i32)]
pub enum Encoding {
    Plain = 0,
    PlainDictionary = 2,
    Rle = 3,
    BitPacked = 4,
    DeltaBinaryPacked = 5,
    DeltaLengthByteArray = 6,
    DeltaByteArray = 7,
    RleDictionary = 8,
    ByteStreamSplit = 9,
    #[num_enum(catch_all)]
    Unknown(i32),
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "PLAIN"),
            Self::PlainDictionary => write!(f, "PLAIN_DICTIONARY"),
            Self::Rle => write!(f, "RLE"),
            Self::BitPacked => write!(f, "BIT_PACKED"),
            Self::DeltaBinaryPacked => write!(f, "DELTA_BINARY_PACKED"),
            Self::DeltaLengthByteArray => write!(f, "DELTA_LENGTH_BYTE_ARRAY"),
            Self::DeltaByteArray => write!(f, "DELTA_BYTE_ARRAY"),
            Self::RleDictionary => write!(f, "RLE_DICTIONARY"),
            Self::ByteStreamSplit => write!(f, "BYTE_STREAM_SPLIT"),
            Self::Unknown(v) => write!(f, "UNKNOWN({v})"),
        }
    }
}

/// The legacy enum-based type annotation, superseded by [`LogicalType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(i32)]
pub enum ConvertedType {
    Utf8 = 0,
    Map = 1,
    MapKeyValue = 2,
    List = 3,
    Enum = 4,
    Decimal = 5,
    Date = 6,
    TimeMillis = 7,
    TimeMicros = 8,
    TimestampMillis = 9,
    TimestampMicros = 10,
    Uint8 = 11,
    Uint16 = 12,
    Uint32 = 13,
    Uint64 = 14,
    Int8 = 15,
    Int16 = 16,
    Int32 = 17,
    Int64 = 18,
    Json = 19,
    Bson = 20,
    Interval = 21,
    #[num_enum(catch_all)]
    Unknown(i32),
}

impl ConvertedType {
    /// Map a converted type onto the equivalent logical type.
    ///
    /// Decimal annotations take their scale and precision from the schema element. Legacy
    /// time types are not adjusted to UTC.
    pub fn to_logical_type(self, scale: Option<i32>, precision: Option<i32>) -> Option<LogicalType> {
        let logical = match self {
            Self::Utf8 => LogicalType::String,
            Self::Map => LogicalType::Map,
            Self::MapKeyValue => LogicalType::MapKeyValue,
            Self::List => LogicalType::List,
            Self::Enum => LogicalType::Enum,
            Self::Decimal => LogicalType::Decimal {
                scale: scale.unwrap_or_default(),
                precision: precision.unwrap_or_default(),
            },
            Self::Date => LogicalType::Date,
            Self::TimeMillis => LogicalType::Time {
                unit: TimeUnit::Millis,
                is_adjusted_to_utc: false,
            },
            Self::TimeMicros => LogicalType::Time {
                unit: TimeUnit::Micros,
                is_adjusted_to_utc: false,
            },
            Self::TimestampMillis => LogicalType::Timestamp {
                unit: TimeUnit::Millis,
                is_adjusted_to_utc: false,
            },
            Self::TimestampMicros => LogicalType::Timestamp {
                unit: TimeUnit::Micros,
                is_adjusted_to_utc: false,
            },
            Self::Uint8 => LogicalType::integer(8, false),
            Self::Uint16 => LogicalType::integer(16, false),
            Self::Uint32 => LogicalType::integer(32, false),
            Self::Uint64 => LogicalType::integer(64, false),
            Self::Int8 => LogicalType::integer(8, true),
            Self::Int16 => LogicalType::integer(16, true),
            Self::Int32 => LogicalType::integer(32, true),
            Self::Int64 => LogicalType::integer(64, true),
            Self::Json => LogicalType::Json,
            Self::Bson => LogicalType::Bson,
            Self::Interval => LogicalType::Interval,
            Self::Unknown(_) => return None,
        };
        Some(logical)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "STRING")]
    #[case(1, "MAP")]
    #[case(2, "MAP_KEY_VALUE")]
    #[case(3, "LIST")]
    #[case(4, "ENUM")]
    #[case(5, "DECIMAL(10,2)")]
    #[case(6, "DATE")]
    #[case(7, "TIME_MILLIS")]
    #[case(8, "TIME_MICROS")]
    #[case(9, "TIMESTAMP_MILLIS")]
    #[case(10, "TIMESTAMP_MICROS")]
    #[case(11, "UINT8")]
    #[case(12, "UINT16")]
    #[case(13, "UINT32")]
    #[case(14, "UINT64")]
    #[case(15, "INT8")]
    #[case(16, "INT16")]
    #[case(17, "INT32")]
    #[case(18, "INT64")]
    #[case(19, "JSON")]
    #[case(20, "BSON")]
    #[case(21, "INTERVAL")]
    fn converted_type_table(#[case] raw: i32, #[case] expected: &str) {
        let logical = ConvertedType::from(raw)
            .to_logical_type(Some(2), Some(10))
            .unwrap();
        assert_eq!(logical.to_string(), expected);
    }

    #[test]
    fn unknown_values_are_retained() {
        assert_eq!(ConvertedType::from(99), ConvertedType::Unknown(99));
        assert_eq!(ConvertedType::Unknown(99).to_logical_type(None, None), None);
        assert_eq!(PhysicalType::from(12), PhysicalType::Unknown(12));
        assert_eq!(i32::from(PhysicalType::ByteArray), 6);
    }

    #[test]
    fn value_widths() {
        assert_eq!(PhysicalType::Int32.value_width(), Some(4));
        assert_eq!(PhysicalType::Double.value_width(), Some(8));
        assert_eq!(PhysicalType::Int96.value_width(), None);
        assert_eq!(PhysicalType::ByteArray.value_width(), None);
    }
}
