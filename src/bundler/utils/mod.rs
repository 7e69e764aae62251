//! Shared helpers for file system, path and process work.

pub mod fs;
pub mod path;
pub mod process;
