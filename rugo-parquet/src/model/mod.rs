//! The footer metadata model and its Thrift decoders.
//!
//! Every decoder reads field headers until STOP, decodes the ids it models when they carry
//! the expected wire type, and skips everything else by wire type.

mod column;
mod file;
mod logical;
mod row_group;
mod schema;
mod types;

pub use column::*;
pub use file::*;
pub use logical::{LogicalType, TimeUnit};
use log::trace;
pub use row_group::*;
use rugo_error::RugoResult;
use rugo_thrift::{CompactReader, FieldHeader, ThriftType};
pub use schema::*;
pub use types::*;

fn skip_field(reader: &mut CompactReader, name: &str, field: FieldHeader) -> RugoResult<()> {
    trace!("skipping {name} field {} of type {:?}", field.id, field.ty);
    reader.skip(field.ty)
}

/// Decode a list of strings, skipping elements of any other type.
fn read_string_list(reader: &mut CompactReader) -> RugoResult<Vec<String>> {
    let mut values = Vec::new();
    reader.read_list(|reader, ty| {
        if ty == ThriftType::Binary {
            values.push(reader.read_string()?);
            Ok(())
        } else {
            reader.skip_element(ty)
        }
    })?;
    Ok(values)
}
