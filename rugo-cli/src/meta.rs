use std::io::{self, Write};
use std::path::Path;

use rugo::error::RugoResult;
use rugo::read_metadata;

use crate::render::write_report;

pub fn exec_meta(file: impl AsRef<Path>, json: bool) -> RugoResult<()> {
    let path = file.as_ref();
    let metadata = read_metadata(path)
        .map_err(|err| err.with_context(format!("reading {}", path.display())))?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &metadata).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        write_report(&mut out, &metadata)?;
    }
    Ok(())
}
