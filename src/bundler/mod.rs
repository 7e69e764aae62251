//! Single executable application bundling.
//!
//! Turns a Node.js project into one native executable:
//!
//! - [`assets`] - Flat asset table discovered from the asset directory
//! - [`descriptor`] - `sea-config.json` handed to the runtime
//! - [`Bundler`] - Ordered pipeline of external tools and file operations
//! - [`Settings`] - Immutable configuration shared by every stage

pub mod assets;
mod builder;
pub mod descriptor;
pub mod error;
mod settings;
pub mod utils;

pub use assets::{AssetMap, map_assets, map_assets_in};
pub use builder::{
    BundledArtifact, Bundler, LOCAL_POSTJECT_PATH, SEA_RESOURCE_NAME, SEA_SENTINEL_FUSE, Stage,
    ToolOverrides, calculate_sha256, detect_toolchain, ensure_sentinel_fuse,
};
pub use descriptor::SeaConfig;
pub use error::{Error, Result};
pub use settings::{
    DEFAULT_ASSETS_DIR, DEFAULT_BUILD_DIR, DEFAULT_ENTRY_OUT, NCC_CLI_PATH, SEA_CONFIG_FILE_NAME,
    Settings, SettingsBuilder, ToolCommand, Toolchain,
};
