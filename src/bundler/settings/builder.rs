//! Builder for constructing Settings.

use super::{
    Settings, Toolchain,
    core::{DEFAULT_ASSETS_DIR, DEFAULT_BUILD_DIR, DEFAULT_ENTRY_OUT},
};
use crate::bundler::{
    error::{Context, ErrorExt},
    utils::path::normalize,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// `app_name`, `entry_in` and `toolchain` are required; everything else
/// falls back to the conventional project layout (`build/`, `assets/`,
/// `index.js`, current directory).
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    app_name: Option<String>,
    entry_in: Option<PathBuf>,
    entry_out: Option<String>,
    build_dir: Option<PathBuf>,
    assets_dir: Option<PathBuf>,
    skip_build: bool,
    toolchain: Option<Toolchain>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root. Default: current directory.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the app name.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the bundler input entry.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn entry_in<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.entry_in = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundled entry file name. Default: `index.js`.
    pub fn entry_out(mut self, name: impl Into<String>) -> Self {
        self.entry_out = Some(name.into());
        self
    }

    /// Sets the build output root. Default: `build`.
    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the asset root. Default: `assets`.
    pub fn assets_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.assets_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skips the project build script.
    pub fn skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }

    /// Sets the external tools.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing, if the app name is
    /// empty or contains a path separator, or if the project root cannot be
    /// made absolute.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let app_name = self.app_name.context("app_name is required")?;
        if app_name.is_empty() || app_name.contains(['/', '\\']) || app_name == ".." {
            crate::bail!("invalid app name {app_name:?}: must be a plain file name");
        }

        let project_root = self.project_root.unwrap_or_else(|| PathBuf::from("."));
        let project_root = project_root
            .absolutize()
            .fs_context("resolving project root", &project_root)?
            .into_owned();

        let entry_out = self
            .entry_out
            .unwrap_or_else(|| DEFAULT_ENTRY_OUT.to_string());
        if entry_out.is_empty() {
            crate::bail!("bundled entry file name cannot be empty");
        }

        Ok(Settings {
            project_root,
            app_name,
            entry_in: normalize(&self.entry_in.context("entry_in is required")?),
            entry_out,
            build_dir: normalize(
                &self
                    .build_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)),
            ),
            assets_dir: normalize(
                &self
                    .assets_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
            ),
            skip_build: self.skip_build,
            toolchain: self.toolchain.context("toolchain is required")?,
        })
    }
}
