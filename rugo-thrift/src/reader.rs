use bytes::Bytes;
use log::trace;
use rugo_error::{RugoResult, rugo_bail, rugo_err};

use crate::{ByteCursor, FieldHeader, ListHeader, MapHeader, ThriftType};

/// Default bound on nested structs and containers.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A compact protocol decoder over a [`ByteCursor`].
///
/// Integers are zigzag varints, container sizes are unsigned varints. The reader tracks how
/// deeply it has descended into structs and containers so that hostile input cannot exhaust
/// the stack.
#[derive(Debug, Clone)]
pub struct CompactReader {
    cursor: ByteCursor,
    depth: usize,
    max_depth: usize,
}

impl CompactReader {
    pub fn new(buffer: impl Into<Bytes>) -> Self {
        Self::with_max_depth(buffer, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(buffer: impl Into<Bytes>, max_depth: usize) -> Self {
        Self {
            cursor: ByteCursor::new(buffer),
            depth: 0,
            max_depth,
        }
    }

    pub fn cursor(&self) -> &ByteCursor {
        &self.cursor
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Unsigned LEB128. Bits beyond the 64th are discarded.
    pub fn read_varint(&mut self) -> RugoResult<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.cursor.read_u8()?;
            if shift < 64 {
                result |= u64::from(byte & 0x7F) << shift;
            }
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift = shift.saturating_add(7);
        }
    }

    pub fn read_i16(&mut self) -> RugoResult<i16> {
        #[allow(clippy::cast_possible_truncation)]
        let value = zigzag_decode(self.read_varint()?) as i16;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> RugoResult<i32> {
        #[allow(clippy::cast_possible_truncation)]
        let value = zigzag_decode(self.read_varint()?) as i32;
        Ok(value)
    }

    pub fn read_i64(&mut self) -> RugoResult<i64> {
        Ok(zigzag_decode(self.read_varint()?))
    }

    pub fn read_byte(&mut self) -> RugoResult<i8> {
        Ok(i8::from_le_bytes([self.cursor.read_u8()?]))
    }

    pub fn read_double(&mut self) -> RugoResult<f64> {
        Ok(f64::from_le_bytes(self.cursor.read_array::<8>()?))
    }

    /// A boolean stored as a container element, which takes one byte.
    pub fn read_bool_element(&mut self) -> RugoResult<bool> {
        Ok(self.cursor.read_u8()? == ThriftType::BoolTrue.tag())
    }

    /// Length-prefixed bytes.
    pub fn read_binary(&mut self) -> RugoResult<Bytes> {
        let len = self.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| rugo_err!(InvalidLength: "binary length {} does not fit in memory", len))?;
        self.cursor.read_bytes(len)
    }

    /// Length-prefixed bytes, converted to a string. Invalid UTF-8 is replaced.
    pub fn read_string(&mut self) -> RugoResult<String> {
        Ok(String::from_utf8_lossy(&self.read_binary()?).into_owned())
    }

    /// Read a field header, returning `None` at the struct's STOP marker.
    ///
    /// `last_id` is the id of the previous field in the same struct (0 at the start of every
    /// struct) and is updated in place.
    pub fn read_field_header(&mut self, last_id: &mut i16) -> RugoResult<Option<FieldHeader>> {
        let byte = self.cursor.read_u8()?;
        if byte == 0 {
            return Ok(None);
        }
        let ty = ThriftType::from_nibble(byte);
        let delta = byte >> 4;
        let id = if delta == 0 {
            self.read_i16()?
        } else {
            last_id.wrapping_add(i16::from(delta))
        };
        *last_id = id;
        Ok(Some(FieldHeader { id, ty }))
    }

    /// Read a list or set header. A count nibble of 15 means the size follows as a varint.
    pub fn read_list_header(&mut self) -> RugoResult<ListHeader> {
        let byte = self.cursor.read_u8()?;
        let elem_type = ThriftType::from_nibble(byte);
        let size = match byte >> 4 {
            15 => self.read_size()?,
            nibble => usize::from(nibble),
        };
        Ok(ListHeader { elem_type, size })
    }

    /// Read a map header.
    ///
    /// The high nibble of the first byte is the size, 15 meaning the size follows as a varint.
    /// A non-empty map then has one byte holding the key type (high nibble) and value type
    /// (low nibble). An empty map has no type byte.
    pub fn read_map_header(&mut self) -> RugoResult<MapHeader> {
        let first = self.cursor.read_u8()?;
        let size = match first >> 4 {
            0 => {
                return Ok(MapHeader {
                    key_type: ThriftType::Stop,
                    value_type: ThriftType::Stop,
                    size: 0,
                });
            }
            15 => self.read_size()?,
            nibble => usize::from(nibble),
        };
        let types = self.cursor.read_u8()?;
        Ok(MapHeader {
            key_type: ThriftType::from_nibble(types >> 4),
            value_type: ThriftType::from_nibble(types),
            size,
        })
    }

    fn read_size(&mut self) -> RugoResult<usize> {
        let size = self.read_varint()?;
        usize::try_from(size)
            .map_err(|_| rugo_err!(InvalidLength: "container size {} does not fit in memory", size))
    }

    /// Decode a struct by handing each field to `on_field` until the STOP marker.
    ///
    /// `on_field` must consume exactly the field's value, typically by calling [`Self::skip`]
    /// for ids it does not recognise.
    pub fn read_struct<F>(&mut self, mut on_field: F) -> RugoResult<()>
    where
        F: FnMut(&mut Self, FieldHeader) -> RugoResult<()>,
    {
        self.descend()?;
        let mut last_id = 0i16;
        while let Some(field) = self.read_field_header(&mut last_id)? {
            on_field(self, field)?;
        }
        self.ascend();
        Ok(())
    }

    /// Decode every element of a list or set with `on_element`.
    pub fn read_list<F>(&mut self, mut on_element: F) -> RugoResult<()>
    where
        F: FnMut(&mut Self, ThriftType) -> RugoResult<()>,
    {
        let header = self.read_list_header()?;
        self.check_container_size(header.size)?;
        self.descend()?;
        for _ in 0..header.size {
            on_element(self, header.elem_type)?;
        }
        self.ascend();
        Ok(())
    }

    /// Consume one value of type `ty` appearing as a struct field, without interpreting it.
    ///
    /// Boolean fields carry their value in the header, so they consume nothing here.
    pub fn skip(&mut self, ty: ThriftType) -> RugoResult<()> {
        if ty.is_bool() {
            return Ok(());
        }
        self.skip_value(ty)
    }

    /// Consume one value of type `ty` appearing as a container element.
    ///
    /// Unlike fields, boolean elements occupy one byte.
    pub fn skip_element(&mut self, ty: ThriftType) -> RugoResult<()> {
        if ty.is_bool() {
            return self.read_bool_element().map(drop);
        }
        self.skip_value(ty)
    }

    fn skip_value(&mut self, ty: ThriftType) -> RugoResult<()> {
        match ty {
            ThriftType::Stop => Ok(()),
            ThriftType::BoolTrue | ThriftType::BoolFalse | ThriftType::Byte => {
                self.cursor.read_u8().map(drop)
            }
            ThriftType::I16 | ThriftType::I32 | ThriftType::I64 => self.read_varint().map(drop),
            ThriftType::Double => self.cursor.read_array::<8>().map(drop),
            ThriftType::Binary => self.read_binary().map(drop),
            ThriftType::List | ThriftType::Set => {
                self.read_list(|reader, elem_type| reader.skip_element(elem_type))
            }
            ThriftType::Map => {
                let header = self.read_map_header()?;
                self.check_container_size(header.size)?;
                self.descend()?;
                for _ in 0..header.size {
                    self.skip_element(header.key_type)?;
                    self.skip_element(header.value_type)?;
                }
                self.ascend();
                Ok(())
            }
            ThriftType::Struct => self.read_struct(|reader, field| {
                trace!("skipping nested field {} of type {:?}", field.id, field.ty);
                reader.skip(field.ty)
            }),
            ThriftType::Unknown(tag) => {
                trace!(
                    "consuming one byte for unknown type tag {tag} at offset {}",
                    self.position()
                );
                self.cursor.read_u8().map(drop)
            }
        }
    }

    /// Every element takes at least one byte, so a container cannot hold more elements than
    /// there are bytes left.
    fn check_container_size(&self, size: usize) -> RugoResult<()> {
        if size > self.cursor.remaining() {
            rugo_bail!(
                InvalidLength: "container of {} elements at offset {} exceeds the {} remaining bytes",
                size,
                self.position(),
                self.cursor.remaining()
            );
        }
        Ok(())
    }

    fn descend(&mut self) -> RugoResult<()> {
        if self.depth >= self.max_depth {
            rugo_bail!(NestingTooDeep: self.max_depth);
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Map an unsigned zigzag value back to a signed integer.
#[inline]
pub fn zigzag_decode(n: u64) -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let half = (n >> 1) as i64;
    half ^ -((n & 1) as i64)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rugo_error::RugoError;

    use super::*;
    use crate::CompactWriter;

    fn reader(bytes: &[u8]) -> CompactReader {
        CompactReader::new(Bytes::copy_from_slice(bytes))
    }

    #[rstest]
    #[case(&[0x00], 0)]
    #[case(&[0x7F], 127)]
    #[case(&[0x80, 0x01], 128)]
    #[case(&[0xE5, 0x8E, 0x26], 624_485)]
    #[case(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01], u64::MAX)]
    fn varints(#[case] bytes: &[u8], #[case] expected: u64) {
        assert_eq!(reader(bytes).read_varint().unwrap(), expected);
    }

    #[test]
    fn truncated_varint_is_end_of_input() {
        assert!(matches!(
            reader(&[0x80, 0x80]).read_varint(),
            Err(RugoError::UnexpectedEndOfInput(..))
        ));
    }

    #[test]
    fn overlong_varint_does_not_panic() {
        let mut bytes = vec![0xFF; 20];
        bytes.push(0x00);
        assert!(reader(&bytes).read_varint().is_ok());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, -1)]
    #[case(2, 1)]
    #[case(3, -2)]
    #[case(4_294_967_294, 2_147_483_647)]
    #[case(4_294_967_295, -2_147_483_648)]
    #[case(u64::MAX, i64::MIN)]
    fn zigzag(#[case] encoded: u64, #[case] decoded: i64) {
        assert_eq!(zigzag_decode(encoded), decoded);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(0, 15)]
    #[case(4, 7)]
    #[case(100, 15)]
    fn delta_field_ids(#[case] last: i16, #[case] delta: u8) {
        let header = (delta << 4) | ThriftType::I32.tag();
        let mut last_id = last;
        let field = reader(&[header])
            .read_field_header(&mut last_id)
            .unwrap()
            .unwrap();
        assert_eq!(field.id, last + i16::from(delta));
        assert_eq!(field.ty, ThriftType::I32);
        assert_eq!(last_id, field.id);
    }

    #[rstest]
    #[case(&[0x06, 0x28], 20)]
    #[case(&[0x06, 0x01], -1)]
    #[case(&[0x06, 0xC8, 0x01], 100)]
    fn explicit_field_ids(#[case] bytes: &[u8], #[case] expected: i16) {
        let mut last_id = 3;
        let field = reader(bytes)
            .read_field_header(&mut last_id)
            .unwrap()
            .unwrap();
        assert_eq!(field.id, expected);
        assert_eq!(field.ty, ThriftType::I64);
    }

    #[test]
    fn stop_marker_ends_struct() {
        let mut last_id = 5;
        assert_eq!(reader(&[0x00]).read_field_header(&mut last_id).unwrap(), None);
        assert_eq!(last_id, 5);
    }

    #[test]
    fn list_headers() {
        let header = reader(&[0x38]).read_list_header().unwrap();
        assert_eq!(header.size, 3);
        assert_eq!(header.elem_type, ThriftType::Binary);

        let header = reader(&[0xF5, 0x96, 0x01]).read_list_header().unwrap();
        assert_eq!(header.size, 150);
        assert_eq!(header.elem_type, ThriftType::I32);
    }

    #[test]
    fn map_headers() {
        let mut empty = reader(&[0x00, 0x15]);
        assert_eq!(empty.read_map_header().unwrap().size, 0);
        assert_eq!(empty.position(), 1);

        let header = reader(&[0x20, 0x85]).read_map_header().unwrap();
        assert_eq!(header.size, 2);
        assert_eq!(header.key_type, ThriftType::Binary);
        assert_eq!(header.value_type, ThriftType::I32);

        let header = reader(&[0xF0, 0x96, 0x01, 0x55]).read_map_header().unwrap();
        assert_eq!(header.size, 150);
        assert_eq!(header.key_type, ThriftType::I32);
    }

    #[test]
    fn map_in_nibble_form_is_skipped() {
        // map<i32, i32> of two entries, then a trailing byte
        let mut map = reader(&[0x20, 0x55, 0x02, 0x04, 0x06, 0x08, 0x7F]);
        map.skip(ThriftType::Map).unwrap();
        assert_eq!(map.position(), 6);
    }

    #[test]
    fn large_map_is_skipped() {
        let mut writer = CompactWriter::new();
        writer.write_map_header(ThriftType::I32, ThriftType::Binary, 20);
        for i in 0..20 {
            writer.write_zigzag(i);
            writer.write_binary(b"v");
        }
        writer.write_raw(&[0x7F]);
        let bytes = writer.finish();
        assert_eq!(bytes[..2], [0xF0, 20]);

        let mut map = CompactReader::new(bytes);
        map.skip(ThriftType::Map).unwrap();
        assert_eq!(map.cursor().remaining(), 1);
    }

    #[test]
    fn bool_elements_take_one_byte() {
        let mut elements = reader(&[0x01, 0x02]);
        assert!(elements.read_bool_element().unwrap());
        elements.skip_element(ThriftType::BoolFalse).unwrap();
        assert!(elements.cursor().is_empty());
        // as a field the value lives in the header
        elements.skip(ThriftType::BoolTrue).unwrap();
    }

    #[test]
    fn strings_past_end_are_invalid_length() {
        assert!(matches!(
            reader(&[0x05, b'a', b'b']).read_binary(),
            Err(RugoError::InvalidLength(..))
        ));
    }

    /// Writes one value of the given type as field 1 of a struct, followed by a sentinel
    /// field, so the skip can be checked to land exactly on the sentinel.
    fn value_then_sentinel(ty: ThriftType) -> Bytes {
        let mut writer = CompactWriter::new();
        match ty {
            ThriftType::BoolTrue | ThriftType::BoolFalse => {
                writer.write_bool_field(1, ty == ThriftType::BoolTrue)
            }
            ThriftType::Byte => {
                writer.write_field_header(1, ty);
                writer.write_raw(&[0x7A]);
            }
            ThriftType::I16 => {
                writer.write_field_header(1, ty);
                writer.write_zigzag(-123);
            }
            ThriftType::I32 => writer.write_i32_field(1, -12_345),
            ThriftType::I64 => writer.write_i64_field(1, i64::MIN),
            ThriftType::Double => {
                writer.write_field_header(1, ty);
                writer.write_raw(&1.5f64.to_le_bytes());
            }
            ThriftType::Binary => writer.write_binary_field(1, b"skip me"),
            ThriftType::List | ThriftType::Set => {
                writer.write_field_header(1, ty);
                writer.write_list_header(ThriftType::Struct, 2);
                for value in [1, 2] {
                    writer.begin_struct();
                    writer.write_i32_field(1, value);
                    writer.write_binary_field(2, b"nested");
                    writer.end_struct();
                }
            }
            ThriftType::Map => {
                writer.write_field_header(1, ty);
                writer.write_map_header(ThriftType::Binary, ThriftType::BoolTrue, 2);
                writer.write_binary(b"a");
                writer.write_raw(&[1]);
                writer.write_binary(b"b");
                writer.write_raw(&[2]);
            }
            ThriftType::Struct => {
                writer.write_field_header(1, ty);
                writer.begin_struct();
                writer.write_i64_field(3, 99);
                writer.write_field_header(200, ThriftType::List);
                writer.write_list_header(ThriftType::BoolTrue, 3);
                writer.write_raw(&[1, 2, 1]);
                writer.write_field_header(201, ThriftType::Map);
                writer.write_map_header(ThriftType::I32, ThriftType::I32, 0);
                writer.end_struct();
            }
            ThriftType::Stop | ThriftType::Unknown(_) => unreachable!(),
        }
        writer.write_i32_field(2, 0x5EED);
        writer.finish()
    }

    #[rstest]
    fn skip_lands_on_sentinel(
        #[values(
            ThriftType::BoolTrue,
            ThriftType::BoolFalse,
            ThriftType::Byte,
            ThriftType::I16,
            ThriftType::I32,
            ThriftType::I64,
            ThriftType::Double,
            ThriftType::Binary,
            ThriftType::List,
            ThriftType::Set,
            ThriftType::Map,
            ThriftType::Struct
        )]
        ty: ThriftType,
    ) {
        let mut reader = CompactReader::new(value_then_sentinel(ty));
        let mut last_id = 0;
        let field = reader.read_field_header(&mut last_id).unwrap().unwrap();
        assert_eq!(field.id, 1);
        reader.skip(field.ty).unwrap();

        let sentinel = reader.read_field_header(&mut last_id).unwrap().unwrap();
        assert_eq!(sentinel.id, 2);
        assert_eq!(reader.read_i32().unwrap(), 0x5EED);
        assert!(reader.cursor().is_empty());
    }

    #[test]
    fn unknown_tag_consumes_one_byte() {
        let mut unknown = reader(&[0xAB, 0x02]);
        unknown.skip(ThriftType::Unknown(13)).unwrap();
        assert_eq!(unknown.position(), 1);
        assert_eq!(unknown.read_i32().unwrap(), 1);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        // 0x1C: a struct-typed field with id delta 1, repeated.
        let bytes = vec![0x1C; 100];
        let mut reader = CompactReader::with_max_depth(Bytes::from(bytes), 16);
        assert!(matches!(
            reader.skip(ThriftType::Struct),
            Err(RugoError::NestingTooDeep(16, _))
        ));
    }

    #[test]
    fn huge_list_size_is_invalid_length() {
        // 0xF9: size follows as varint, element type LIST
        let mut huge = reader(&[0xF9, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 0x19]);
        assert!(matches!(
            huge.skip(ThriftType::List),
            Err(RugoError::InvalidLength(..))
        ));
    }

    #[test]
    fn zero_width_elements_are_bounded() {
        // 0x30: three STOP-typed elements, which consume nothing
        let mut stops = reader(&[0x30, 0x00, 0x00, 0x00]);
        stops.skip(ThriftType::List).unwrap();
        assert_eq!(stops.position(), 1);

        // 0xF0 then a varint size of 2^20
        let mut many = reader(&[0xF0, 0x80, 0x80, 0x40]);
        assert!(matches!(
            many.skip(ThriftType::List),
            Err(RugoError::InvalidLength(..))
        ));
    }
}
