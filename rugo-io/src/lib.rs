//! Core traits and implementations for positioned IO.
//!
//! The footer reader needs exactly two things from its backing store: the total size, and the
//! bytes of an explicit range. This crate provides the [`RugoReadAt`] trait for that, with
//! implementations for in-memory buffers and local files.

pub use file::*;
pub use offset::*;
pub use read::*;

mod file;
mod offset;
mod read;
