//! SEA configuration (`sea-config.json`) construction.
//!
//! `node --experimental-sea-config <file>` reads this document to produce the
//! preparation blob later injected into the executable.

use crate::bundler::{AssetMap, Result, Settings, error::ErrorExt, utils::path::to_native_string};
use serde::Serialize;
use std::path::PathBuf;

/// SEA configuration handed to the runtime.
///
/// `disableExperimentalSEAWarning`, `useSnapshot` and `useCodeCache` are
/// fixed: blob generation and injection are only exercised with a
/// code-cache, snapshot-free blob.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeaConfig<'a> {
    main: String,
    output: String,
    #[serde(rename = "disableExperimentalSEAWarning")]
    disable_experimental_sea_warning: bool,
    use_snapshot: bool,
    use_code_cache: bool,
    assets: &'a AssetMap,
}

impl<'a> SeaConfig<'a> {
    /// Builds the configuration for `settings`, embedding `assets`.
    ///
    /// `main` is the bundled entry and `output` the blob path, both relative
    /// to the project root.
    pub fn new(settings: &Settings, assets: &'a AssetMap) -> Result<Self> {
        Ok(Self {
            main: to_native_string(&settings.entry_path())?,
            output: to_native_string(&settings.blob_path())?,
            disable_experimental_sea_warning: true,
            use_snapshot: false,
            use_code_cache: true,
            assets,
        })
    }

    /// Returns the embedded program path.
    pub fn main(&self) -> &str {
        &self.main
    }

    /// Returns the blob output path.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the embedded assets.
    pub fn assets(&self) -> &AssetMap {
        self.assets
    }

    /// Serializes the configuration as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Writes the configuration to [`Settings::sea_config_path`], replacing
    /// any previous file, and returns the absolute path written.
    pub async fn write(&self, settings: &Settings) -> Result<PathBuf> {
        let path = settings.resolve(&settings.sea_config_path());
        let json = self.to_json()?;

        tokio::fs::write(&path, json)
            .await
            .fs_context("writing SEA config", &path)?;

        log::debug!("Wrote SEA config {}", path.display());
        Ok(path)
    }
}
