use std::path::Path;

use rugo::error::{RugoResult, rugo_bail};
use rugo::{ParquetOpenOptions, test_bloom_filter};

pub fn exec_bloom(
    file: impl AsRef<Path>,
    value: &str,
    column: Option<&str>,
    offset: Option<u64>,
    length: Option<u64>,
) -> RugoResult<()> {
    let path = file.as_ref();
    match (column, offset) {
        (_, Some(offset)) => {
            println!("{}", verdict(test_bloom_filter(path, offset, length, value)));
        }
        (Some(column), None) => {
            let file = ParquetOpenOptions::file(path)?
                .open()
                .map_err(|err| err.with_context(format!("reading {}", path.display())))?;
            for (i, result) in file.might_contain(column, value).into_iter().enumerate() {
                let verdict = result.map_or("no bloom filter", verdict);
                println!("RowGroup {i} {column}: {verdict}");
            }
        }
        (None, None) => rugo_bail!(InvalidArgument: "either a column or an offset is required"),
    }
    Ok(())
}

fn verdict(might_contain: bool) -> &'static str {
    if might_contain {
        "maybe present"
    } else {
        "absent"
    }
}
