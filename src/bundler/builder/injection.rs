//! Blob injection into the copied runtime executable.

use crate::bundler::{Error, Result, Settings, error::ErrorExt, utils::process::run_tool};
use std::{ffi::OsStr, io, path::Path};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Resource name the runtime looks up at startup.
pub const SEA_RESOURCE_NAME: &str = "NODE_SEA_BLOB";

/// Sentinel fuse compiled into SEA-capable Node.js binaries.
pub const SEA_SENTINEL_FUSE: &str = "NODE_SEA_FUSE_fce680ab2cc467b6e072b8b5df1996b2";

/// Read size for the sentinel scan.
const SCAN_CHUNK_SIZE: usize = 64 * 1024;

/// Checks that `executable` carries the SEA sentinel fuse.
///
/// The injector flips the fuse after writing the blob; a binary without it
/// cannot become a single executable application. The file is scanned in
/// chunks, never loaded whole.
pub async fn ensure_sentinel_fuse(executable: &Path) -> Result<()> {
    let file = tokio::fs::File::open(executable)
        .await
        .fs_context("opening executable", executable)?;

    let found = stream_contains(file, SEA_SENTINEL_FUSE.as_bytes(), SCAN_CHUNK_SIZE)
        .await
        .fs_context("reading executable", executable)?;

    if found {
        Ok(())
    } else {
        Err(Error::SentinelNotFound {
            path: executable.to_path_buf(),
            fuse: SEA_SENTINEL_FUSE,
        })
    }
}

/// Searches `reader` for `needle`, keeping the last `needle.len() - 1`
/// bytes of each chunk so matches across chunk boundaries are found.
async fn stream_contains<R>(mut reader: R, needle: &[u8], chunk_size: usize) -> io::Result<bool>
where
    R: AsyncRead + Unpin,
{
    if needle.is_empty() {
        return Ok(true);
    }

    let keep = needle.len() - 1;
    let mut window = Vec::with_capacity(keep + chunk_size);
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            return Ok(false);
        }
        window.extend_from_slice(&buffer[..n]);
        if contains(&window, needle) {
            return Ok(true);
        }
        let tail = window.len().saturating_sub(keep);
        window.drain(..tail);
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Injects the blob into the copied executable with postject.
///
/// Runs `<injector> <app> NODE_SEA_BLOB <blob> --sentinel-fuse <fuse> --overwrite`
/// from the project root.
pub async fn inject_blob(settings: &Settings) -> Result<()> {
    let app_path = settings.app_path();
    let blob_path = settings.blob_path();

    ensure_sentinel_fuse(&settings.resolve(&app_path)).await?;

    run_tool(
        &settings.toolchain().injector,
        [
            app_path.as_os_str(),
            OsStr::new(SEA_RESOURCE_NAME),
            blob_path.as_os_str(),
            OsStr::new("--sentinel-fuse"),
            OsStr::new(SEA_SENTINEL_FUSE),
            OsStr::new("--overwrite"),
        ],
        settings.project_root(),
    )
    .await
}
