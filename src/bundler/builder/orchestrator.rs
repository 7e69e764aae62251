//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that drives the fixed
//! single executable application pipeline, one blocking stage at a time.

use crate::bundler::{
    AssetMap, Result, SeaConfig, Settings,
    assets::map_assets_in,
    error::ErrorExt,
    utils::{
        fs::{DirStatus, copy_file, create_dir_all},
        process::run_tool,
    },
};
use std::{ffi::OsStr, fmt, path::PathBuf};

use super::{checksum::calculate_sha256, injection::inject_blob};

/// One step of the bundling pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Create the build output root if missing
    CreateBuildDir,
    /// `npm run build`
    ProjectBuild,
    /// ncc bundles the entry into a single file
    BundleSource,
    /// Write `sea-config.json`
    WriteDescriptor,
    /// `node --experimental-sea-config` produces the blob
    GenerateBlob,
    /// Copy the runtime executable to the app path
    CopyRuntime,
    /// postject writes the blob into the copied executable
    InjectBlob,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::CreateBuildDir,
        Stage::ProjectBuild,
        Stage::BundleSource,
        Stage::WriteDescriptor,
        Stage::GenerateBlob,
        Stage::CopyRuntime,
        Stage::InjectBlob,
    ];

    /// Short stable identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CreateBuildDir => "create-build-dir",
            Stage::ProjectBuild => "project-build",
            Stage::BundleSource => "bundle-source",
            Stage::WriteDescriptor => "write-descriptor",
            Stage::GenerateBlob => "generate-blob",
            Stage::CopyRuntime => "copy-runtime",
            Stage::InjectBlob => "inject-blob",
        }
    }

    /// Progress message shown when the stage starts.
    pub fn description(&self) -> &'static str {
        match self {
            Stage::CreateBuildDir => "Preparing build directory",
            Stage::ProjectBuild => "Running: npm run build",
            Stage::BundleSource => "Compiling source into single file",
            Stage::WriteDescriptor => "Generating SEA config file",
            Stage::GenerateBlob => "Generating SEA blob",
            Stage::CopyRuntime => "Generating blank SEA",
            Stage::InjectBlob => "Injecting source and assets into SEA",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The finished single-file executable.
#[derive(Clone, Debug)]
pub struct BundledArtifact {
    /// Absolute path of the executable
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256
    pub checksum: String,
}

/// Main bundler orchestrator.
///
/// Runs the pipeline stages strictly in sequence. The first failing stage
/// aborts the run; artifacts written by earlier stages stay on disk.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_sea::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_sea::bundler::Result<()> {
/// let bundler = Bundler::new(settings);
/// let artifact = bundler.bundle().await?;
/// println!("Created {} ({} bytes)", artifact.path.display(), artifact.size);
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the stages this run executes, in order.
    ///
    /// [`Stage::ProjectBuild`] is left out when the build script is skipped.
    pub fn stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| !(self.settings.skip_build() && *stage == Stage::ProjectBuild))
            .collect()
    }

    /// Runs the whole pipeline.
    pub async fn bundle(&self) -> Result<BundledArtifact> {
        self.bundle_with_progress(|_| {}).await
    }

    /// Runs the whole pipeline, calling `on_stage` as each stage starts.
    pub async fn bundle_with_progress<F>(&self, mut on_stage: F) -> Result<BundledArtifact>
    where
        F: FnMut(Stage),
    {
        log::info!("Creating executable binary: {}", self.settings.app_name());

        let assets = map_assets_in(self.settings.project_root(), self.settings.assets_dir())?;

        for stage in self.stages() {
            on_stage(stage);
            log::info!("{}", stage.description());
            self.run_stage(stage, &assets).await?;
        }

        let path = self.settings.resolve(&self.settings.app_path());
        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;

        log::info!("Binary {} built", path.display());

        Ok(BundledArtifact {
            path,
            size,
            checksum,
        })
    }

    async fn run_stage(&self, stage: Stage, assets: &AssetMap) -> Result<()> {
        let settings = &self.settings;
        let root = settings.project_root();
        let toolchain = settings.toolchain();

        match stage {
            Stage::CreateBuildDir => {
                let build_dir = settings.resolve(settings.build_dir());
                match create_dir_all(&build_dir).await? {
                    DirStatus::Created => {
                        log::info!("Create {} directory.", settings.build_dir().display())
                    }
                    DirStatus::Existing => log::info!(
                        "Directory {} already exists.",
                        settings.build_dir().display()
                    ),
                }
                Ok(())
            }
            Stage::ProjectBuild => run_tool(&toolchain.npm, ["run", "build"], root).await,
            Stage::BundleSource => {
                run_tool(
                    &toolchain.ncc,
                    [
                        OsStr::new("build"),
                        settings.entry_in().as_os_str(),
                        OsStr::new("-o"),
                        settings.build_dir().as_os_str(),
                    ],
                    root,
                )
                .await
            }
            Stage::WriteDescriptor => {
                SeaConfig::new(settings, assets)?.write(settings).await?;
                Ok(())
            }
            Stage::GenerateBlob => {
                let config = settings.sea_config_path();
                run_tool(
                    &toolchain.node,
                    [OsStr::new("--experimental-sea-config"), config.as_os_str()],
                    root,
                )
                .await
            }
            Stage::CopyRuntime => {
                let target = settings.resolve(&settings.app_path());
                let image = toolchain.runtime_image();
                let bytes = copy_file(image, &target).await?;
                log::debug!(
                    "Copied {} ({} bytes) to {}",
                    image.display(),
                    bytes,
                    target.display()
                );
                Ok(())
            }
            Stage::InjectBlob => inject_blob(settings).await,
        }
    }
}
