//! Configuration structures for bundling operations.
//!
//! [`Settings`] is the immutable, fully resolved configuration of one run.
//! It is built once by [`SettingsBuilder`] and passed by reference to every
//! pipeline stage.

mod builder;
mod core;
mod toolchain;

pub use builder::SettingsBuilder;
pub use self::core::{
    DEFAULT_ASSETS_DIR, DEFAULT_BUILD_DIR, DEFAULT_ENTRY_OUT, NCC_CLI_PATH, SEA_CONFIG_FILE_NAME,
    Settings,
};
pub use toolchain::{ToolCommand, Toolchain};
