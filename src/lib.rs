//! Single executable application bundler for Node.js projects
//!
//! This library packages a Node.js project into one native executable:
//! - runs the project build and bundles the entry with ncc
//! - embeds every file under the asset directory
//! - injects the SEA blob into a copy of the node runtime with postject
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod preflight;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
