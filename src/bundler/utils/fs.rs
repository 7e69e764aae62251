//! File system utilities for bundling.
//!
//! Provides idempotent directory creation and file duplication with
//! contextual error reporting.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Outcome of [`create_dir_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirStatus {
    /// The directory was created by this call
    Created,
    /// The directory was already present
    Existing,
}

/// Creates all of the directories of the specified path.
///
/// A directory that already exists is not an error. Any other failure is
/// logged and returned.
pub async fn create_dir_all(path: &Path) -> Result<DirStatus> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => return Ok(DirStatus::Existing),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("inspecting directory", path),
    }

    match fs::create_dir_all(path).await {
        Ok(()) => Ok(DirStatus::Created),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
            Ok(DirStatus::Existing)
        }
        Err(e) => {
            log::error!("Error creating directory {}: {}", path.display(), e);
            Err(e).fs_context("creating directory", path)
        }
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Permission bits of the source are preserved, so copying an executable
/// yields an executable. An existing destination is overwritten.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let metadata = fs::metadata(from)
        .await
        .fs_context("reading source file", from)?;
    if !metadata.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating destination directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)
}
