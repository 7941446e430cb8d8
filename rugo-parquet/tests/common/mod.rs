#![allow(dead_code)]

use bytes::Bytes;
use rugo_thrift::{CompactWriter, ThriftType};

/// A schema element to encode into a synthetic footer.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: &'static str,
    pub physical_type: Option<i32>,
    pub num_children: Option<i32>,
    pub converted_type: Option<i32>,
    /// Id of an empty logical type union variant, e.g. 1 for STRING.
    pub logical_type: Option<i16>,
}

impl Element {
    pub fn group(name: &'static str, num_children: i32) -> Self {
        Self {
            name,
            num_children: Some(num_children),
            ..Default::default()
        }
    }

    pub fn leaf(name: &'static str, physical_type: i32) -> Self {
        Self {
            name,
            physical_type: Some(physical_type),
            ..Default::default()
        }
    }
}

/// A column chunk to encode into a synthetic footer.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub path: Vec<&'static str>,
    pub physical_type: i32,
    pub null_count: Option<i64>,
    pub min_value: Option<Vec<u8>>,
    pub max_value: Option<Vec<u8>>,
    pub bloom_filter_offset: Option<i64>,
    pub bloom_filter_length: Option<i32>,
}

pub fn write_footer(num_rows: i64, schema: &[Element], row_groups: &[Vec<Chunk>]) -> Bytes {
    let mut writer = CompactWriter::new();
    writer.write_i32_field(1, 2);

    writer.write_field_header(2, ThriftType::List);
    writer.write_list_header(ThriftType::Struct, schema.len());
    for element in schema {
        write_element(&mut writer, element);
    }

    writer.write_i64_field(3, num_rows);

    writer.write_field_header(4, ThriftType::List);
    writer.write_list_header(ThriftType::Struct, row_groups.len());
    for chunks in row_groups {
        writer.begin_struct();
        writer.write_field_header(1, ThriftType::List);
        writer.write_list_header(ThriftType::Struct, chunks.len());
        for chunk in chunks {
            write_chunk(&mut writer, chunk);
        }
        writer.write_i64_field(2, 1024);
        writer.write_i64_field(3, num_rows);
        writer.end_struct();
    }

    writer.write_binary_field(6, b"rugo synthetic writer");
    writer.end_struct();
    writer.finish()
}

fn write_element(writer: &mut CompactWriter, element: &Element) {
    writer.begin_struct();
    if let Some(physical_type) = element.physical_type {
        writer.write_i32_field(1, physical_type);
    }
    writer.write_binary_field(4, element.name.as_bytes());
    if let Some(num_children) = element.num_children {
        writer.write_i32_field(5, num_children);
    }
    if let Some(converted_type) = element.converted_type {
        writer.write_i32_field(6, converted_type);
    }
    if let Some(variant) = element.logical_type {
        writer.begin_struct_field(10);
        writer.write_empty_struct_field(variant);
        writer.end_struct();
    }
    writer.end_struct();
}

fn write_chunk(writer: &mut CompactWriter, chunk: &Chunk) {
    writer.begin_struct();
    writer.write_i64_field(2, 4);
    writer.begin_struct_field(3);
    writer.write_i32_field(1, chunk.physical_type);
    writer.write_field_header(3, ThriftType::List);
    writer.write_list_header(ThriftType::Binary, chunk.path.len());
    for segment in &chunk.path {
        writer.write_binary(segment.as_bytes());
    }
    writer.write_i32_field(4, 0);
    writer.write_i64_field(5, 10);
    writer.write_i64_field(6, 100);
    writer.write_i64_field(7, 100);
    writer.write_i64_field(9, 4);

    writer.begin_struct_field(12);
    if let Some(null_count) = chunk.null_count {
        writer.write_i64_field(3, null_count);
    }
    if let Some(max_value) = &chunk.max_value {
        writer.write_binary_field(5, max_value);
    }
    if let Some(min_value) = &chunk.min_value {
        writer.write_binary_field(6, min_value);
    }
    writer.end_struct();

    if let Some(offset) = chunk.bloom_filter_offset {
        writer.write_i64_field(14, offset);
    }
    if let Some(length) = chunk.bloom_filter_length {
        writer.write_i32_field(15, length);
    }
    writer.end_struct();
    writer.end_struct();
}

/// Frame a footer as a complete file: leading magic, `data`, footer and trailer.
pub fn write_file(data: &[u8], footer: &[u8]) -> Vec<u8> {
    let mut file = b"PAR1".to_vec();
    file.extend_from_slice(data);
    file.extend_from_slice(footer);
    let footer_len = u32::try_from(footer.len()).unwrap();
    file.extend_from_slice(&footer_len.to_le_bytes());
    file.extend_from_slice(b"PAR1");
    file
}
