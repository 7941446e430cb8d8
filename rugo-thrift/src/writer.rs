use bytes::Bytes;

use crate::ThriftType;

/// A minimal compact protocol encoder for building synthetic payloads in tests.
///
/// The writer keeps one "last field id" per open struct, mirroring how the reader resets
/// the delta base at every nested struct. The outermost scope is open from construction;
/// call [`Self::end_struct`] only for structs opened with [`Self::begin_struct`].
#[derive(Debug)]
pub struct CompactWriter {
    buffer: Vec<u8>,
    last_ids: Vec<i16>,
}

impl Default for CompactWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            last_ids: vec![0],
        }
    }

    pub fn finish(self) -> Bytes {
        Bytes::from(self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push(((value & 0x7F) as u8) | 0x80);
            value >>= 7;
        }
        self.buffer.push((value & 0x7F) as u8);
    }

    pub fn write_zigzag(&mut self, value: i64) {
        #[allow(clippy::cast_sign_loss)]
        let encoded = ((value << 1) ^ (value >> 63)) as u64;
        self.write_varint(encoded);
    }

    /// Writes a field header, using the short delta form when the id allows it.
    pub fn write_field_header(&mut self, id: i16, ty: ThriftType) {
        let last = self.last_ids.last().copied().unwrap_or_default();
        let delta = i32::from(id) - i32::from(last);
        if let Ok(delta @ 1..=15) = u8::try_from(delta) {
            self.buffer.push((delta << 4) | ty.tag());
        } else {
            self.buffer.push(ty.tag());
            self.write_zigzag(i64::from(id));
        }
        if let Some(last) = self.last_ids.last_mut() {
            *last = id;
        }
    }

    pub fn write_list_header(&mut self, elem_type: ThriftType, size: usize) {
        if let Ok(size @ 0..=14) = u8::try_from(size) {
            self.buffer.push((size << 4) | elem_type.tag());
        } else {
            self.buffer.push(0xF0 | elem_type.tag());
            self.write_varint(size as u64);
        }
    }

    /// Writes the size in the high nibble, or 15 and a varint, then the key and value types
    /// unless the map is empty.
    pub fn write_map_header(&mut self, key_type: ThriftType, value_type: ThriftType, size: usize) {
        if let Ok(size @ 0..=14) = u8::try_from(size) {
            self.buffer.push(size << 4);
        } else {
            self.buffer.push(0xF0);
            self.write_varint(size as u64);
        }
        if size > 0 {
            self.buffer.push((key_type.tag() << 4) | value_type.tag());
        }
    }

    pub fn write_binary(&mut self, value: &[u8]) {
        self.write_varint(value.len() as u64);
        self.buffer.extend_from_slice(value);
    }

    pub fn begin_struct(&mut self) {
        self.last_ids.push(0);
    }

    /// Writes the STOP marker and closes the innermost struct.
    pub fn end_struct(&mut self) {
        self.buffer.push(ThriftType::Stop.tag());
        self.last_ids.pop();
    }

    pub fn write_bool_field(&mut self, id: i16, value: bool) {
        let ty = if value {
            ThriftType::BoolTrue
        } else {
            ThriftType::BoolFalse
        };
        self.write_field_header(id, ty);
    }

    pub fn write_i32_field(&mut self, id: i16, value: i32) {
        self.write_field_header(id, ThriftType::I32);
        self.write_zigzag(i64::from(value));
    }

    pub fn write_i64_field(&mut self, id: i16, value: i64) {
        self.write_field_header(id, ThriftType::I64);
        self.write_zigzag(value);
    }

    pub fn write_binary_field(&mut self, id: i16, value: &[u8]) {
        self.write_field_header(id, ThriftType::Binary);
        self.write_binary(value);
    }

    /// Writes a struct-typed field header and opens the nested struct.
    pub fn begin_struct_field(&mut self, id: i16) {
        self.write_field_header(id, ThriftType::Struct);
        self.begin_struct();
    }

    /// Writes an empty struct as field `id`.
    pub fn write_empty_struct_field(&mut self, id: i16) {
        self.begin_struct_field(id);
        self.end_struct();
    }
}
