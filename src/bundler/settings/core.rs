//! Core Settings struct and implementations.

use super::Toolchain;
use std::path::{Path, PathBuf};

/// Default build output root, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default asset root, relative to the project root.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Default file name of the bundled entry produced by ncc.
pub const DEFAULT_ENTRY_OUT: &str = "index.js";

/// File name of the SEA configuration written into the build root.
pub const SEA_CONFIG_FILE_NAME: &str = "sea-config.json";

/// Location of the ncc CLI inside a project's `node_modules`.
pub const NCC_CLI_PATH: &str = "node_modules/@vercel/ncc/dist/ncc/cli.js";

/// Resolved configuration for one bundling run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and
/// shared by reference with every pipeline stage. All relative paths are
/// relative to [`Settings::project_root`], which is also the working
/// directory of every external tool.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_sea::bundler::{SettingsBuilder, ToolCommand, Toolchain};
///
/// # fn example() -> kodegen_bundler_sea::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .app_name("my-app")
///     .entry_in("dist/entry.js")
///     .toolchain(Toolchain {
///         npm: ToolCommand::new("npm"),
///         ncc: ToolCommand::new("node_modules/@vercel/ncc/dist/ncc/cli.js"),
///         node: ToolCommand::new("/usr/bin/node"),
///         injector: ToolCommand::with_args("npx", ["--yes", "postject"]),
///         runtime_image: None,
///     })
///     .build()?;
///
/// assert_eq!(settings.app_path().to_str(), Some("build/my-app"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Absolute project root.
    pub(super) project_root: PathBuf,

    /// Name of the final executable.
    pub(super) app_name: String,

    /// Entry file handed to the bundler.
    pub(super) entry_in: PathBuf,

    /// File name of the bundled entry inside the build root.
    pub(super) entry_out: String,

    /// Build output root.
    pub(super) build_dir: PathBuf,

    /// Asset root scanned for embedded files.
    pub(super) assets_dir: PathBuf,

    /// Skip `npm run build`.
    pub(super) skip_build: bool,

    /// External tools.
    pub(super) toolchain: Toolchain,
}

impl Settings {
    /// Returns the absolute project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the app name.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the bundler input entry, relative to the project root.
    pub fn entry_in(&self) -> &Path {
        &self.entry_in
    }

    /// Returns the build output root, relative to the project root.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Returns the asset root, relative to the project root.
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Returns whether the project build script is skipped.
    pub fn skip_build(&self) -> bool {
        self.skip_build
    }

    /// Returns the external tools.
    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Returns the blob file name, `<app>.blob`.
    pub fn blob_name(&self) -> String {
        format!("{}.blob", self.app_name)
    }

    /// Returns the bundled single-file program, embedded as SEA `main`.
    pub fn entry_path(&self) -> PathBuf {
        self.build_dir.join(&self.entry_out)
    }

    /// Returns where the runtime writes the preparation blob.
    pub fn blob_path(&self) -> PathBuf {
        self.build_dir.join(self.blob_name())
    }

    /// Returns where the SEA configuration is written.
    pub fn sea_config_path(&self) -> PathBuf {
        self.build_dir.join(SEA_CONFIG_FILE_NAME)
    }

    /// Returns the final executable path.
    pub fn app_path(&self) -> PathBuf {
        self.build_dir.join(&self.app_name)
    }

    /// Resolves a project-relative path against the project root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }
}
