//! Read the footer metadata of Parquet files and probe their bloom filters.
//!
//! ```no_run
//! let metadata = rugo::read_metadata("data.parquet")?;
//! for row_group in &metadata.row_groups {
//!     for column in &row_group.columns {
//!         println!("{} {:?} {:?}", column.name, column.logical_type, column.null_count);
//!     }
//! }
//! # Ok::<(), rugo::error::RugoError>(())
//! ```

pub use rugo_parquet::*;
pub use {rugo_error as error, rugo_io as io, rugo_parquet as parquet, rugo_thrift as thrift};
