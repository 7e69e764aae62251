//! External tool detection.
//!
//! Resolves the programs a pipeline run needs: the Node.js runtime, npm, the
//! project-local ncc CLI and the postject injector. Tool paths are made
//! absolute because every stage runs with the project root as its working
//! directory.

use crate::bundler::{Error, Result, ToolCommand, Toolchain, settings::NCC_CLI_PATH};
use std::path::{Path, PathBuf};

/// Project-local postject launcher installed by `npm install postject`.
pub const LOCAL_POSTJECT_PATH: &str = "node_modules/.bin/postject";

/// Explicit tool choices that bypass detection.
#[derive(Clone, Debug, Default)]
pub struct ToolOverrides {
    /// Node.js executable to use instead of `node` on `PATH`
    pub node: Option<PathBuf>,
    /// Injector executable to use instead of postject discovery
    pub injector: Option<PathBuf>,
}

/// Detects the toolchain for a project rooted at `project_root`.
///
/// # Errors
///
/// Fails when the runtime (or an explicit override) cannot be found or is
/// not executable. The other tools are resolved lazily: a missing tool only
/// fails the stage that needs it.
pub fn detect_toolchain(project_root: &Path, overrides: &ToolOverrides) -> Result<Toolchain> {
    let node = match &overrides.node {
        Some(path) => resolve_explicit(path, "--node")?,
        None => which::which("node").map_err(|e| {
            Error::GenericError(format!(
                "Node.js runtime not found in PATH ({e}). Install Node.js >= 20 or pass --node"
            ))
        })?,
    };
    log::debug!("Using Node.js runtime at {}", node.display());

    let npm = match which::which("npm") {
        Ok(path) => ToolCommand::new(path),
        Err(e) => {
            log::debug!("npm not found in PATH: {}", e);
            ToolCommand::new("npm")
        }
    };

    let ncc_path = project_root.join(NCC_CLI_PATH);
    if !ncc_path.is_file() {
        log::warn!(
            "ncc CLI not found at {}. Install it with `npm install --save-dev @vercel/ncc`",
            ncc_path.display()
        );
    }

    let injector = match &overrides.injector {
        Some(path) => ToolCommand::new(resolve_explicit(path, "--injector")?),
        None => detect_injector(project_root),
    };
    log::debug!("Using injector {}", injector.command_line(&[]));

    Ok(Toolchain {
        npm,
        ncc: ToolCommand::new(ncc_path),
        node: ToolCommand::new(node),
        injector,
        runtime_image: None,
    })
}

/// Prefers a project-local postject, falling back to `npx --yes postject`.
fn detect_injector(project_root: &Path) -> ToolCommand {
    let local = project_root.join(LOCAL_POSTJECT_PATH);
    if local.is_file() {
        log::debug!("Found project-local postject at {}", local.display());
        return ToolCommand::new(local);
    }

    let npx = which::which("npx").unwrap_or_else(|e| {
        log::debug!("npx not found in PATH: {}", e);
        PathBuf::from("npx")
    });
    ToolCommand::with_args(npx, ["--yes", "postject"])
}

fn resolve_explicit(path: &Path, flag: &str) -> Result<PathBuf> {
    which::which(path).map_err(|e| {
        Error::GenericError(format!(
            "{flag} {} is not an executable program: {e}",
            path.display()
        ))
    })
}
