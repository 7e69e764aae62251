//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that turns a
//! Node.js project into a single executable application.
//!
//! # Overview
//!
//! The bundler:
//! 1. Maps the asset directory into a flat path table
//! 2. Creates the build directory and runs the project build script
//! 3. Bundles the entry into one file with ncc
//! 4. Writes `sea-config.json` and lets the runtime generate the blob
//! 5. Copies the runtime executable and injects the blob with postject
//! 6. Returns a [`BundledArtifact`] with size and checksum
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for the artifact
//! - [`injection`] - Sentinel fuse check and postject invocation
//! - [`orchestrator`] - Main [`Bundler`] struct and pipeline stages
//! - [`tool_detection`] - External tool discovery

mod checksum;
mod injection;
mod orchestrator;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use injection::{SEA_RESOURCE_NAME, SEA_SENTINEL_FUSE, ensure_sentinel_fuse};
pub use orchestrator::{BundledArtifact, Bundler, Stage};
pub use tool_detection::{LOCAL_POSTJECT_PATH, ToolOverrides, detect_toolchain};
