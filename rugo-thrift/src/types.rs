use num_enum::FromPrimitive;

/// The wire type carried in the low nibble of a field, list or map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum ThriftType {
    Stop = 0,
    /// A boolean field whose value is `true`. In container elements, any boolean.
    BoolTrue = 1,
    /// A boolean field whose value is `false`.
    BoolFalse = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    /// Length-prefixed bytes; used for both strings and binary.
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
    /// Any tag outside the compact protocol's type space.
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl ThriftType {
    /// Decode the low nibble of a header byte.
    pub fn from_nibble(byte: u8) -> Self {
        Self::from(byte & 0x0F)
    }

    /// The wire tag of this type.
    pub fn tag(self) -> u8 {
        match self {
            ThriftType::Stop => 0,
            ThriftType::BoolTrue => 1,
            ThriftType::BoolFalse => 2,
            ThriftType::Byte => 3,
            ThriftType::I16 => 4,
            ThriftType::I32 => 5,
            ThriftType::I64 => 6,
            ThriftType::Double => 7,
            ThriftType::Binary => 8,
            ThriftType::List => 9,
            ThriftType::Set => 10,
            ThriftType::Map => 11,
            ThriftType::Struct => 12,
            ThriftType::Unknown(tag) => tag,
        }
    }

    pub fn is_bool(self) -> bool {
        matches!(self, ThriftType::BoolTrue | ThriftType::BoolFalse)
    }
}

/// The header of a struct field: its id and wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub id: i16,
    pub ty: ThriftType,
}

impl FieldHeader {
    /// For boolean fields the value lives in the type nibble.
    pub fn bool_value(&self) -> Option<bool> {
        match self.ty {
            ThriftType::BoolTrue => Some(true),
            ThriftType::BoolFalse => Some(false),
            _ => None,
        }
    }
}

/// The header of a list or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub elem_type: ThriftType,
    pub size: usize,
}

/// The header of a map. Empty maps carry no key or value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub key_type: ThriftType,
    pub value_type: ThriftType,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for tag in 0u8..=15 {
            assert_eq!(ThriftType::from(tag).tag(), tag);
        }
        assert_eq!(ThriftType::from(13), ThriftType::Unknown(13));
        assert_eq!(ThriftType::from_nibble(0x1C), ThriftType::Struct);
        assert!(ThriftType::BoolFalse.is_bool());
        assert!(!ThriftType::Byte.is_bool());
    }
}
