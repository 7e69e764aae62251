//! Command line interface for the SEA bundler.
//!
//! Runs the startup checks, resolves settings from `package.json` and the
//! command line, then drives the bundling pipeline with progress output.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{Bundler, Settings, SettingsBuilder, detect_toolchain};
use crate::error::{CliError, Result};
use crate::metadata::{ManifestError, PackageJson, load_manifest};
use crate::preflight::{check_host_os, check_runtime_version, probe_runtime};
use path_absolutize::Absolutize;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs the bundler for already parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    let runtime_config = RuntimeConfig::from(args);

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let settings = prepare(args, &runtime_config).await?;
    let bundler = Bundler::new(settings);

    runtime_config.section(&format!(
        "Creating executable binary: {}",
        bundler.settings().app_name()
    ))?;

    let artifact = bundler
        .bundle_with_progress(|stage| {
            if let Err(e) = runtime_config.progress(stage.description()) {
                log::debug!("Failed to print progress for {}: {}", stage, e);
            }
        })
        .await?;

    let shown = artifact
        .path
        .strip_prefix(bundler.settings().project_root())
        .unwrap_or(&artifact.path);
    runtime_config.success(&format!("Binary {} built", shown.display()))?;
    runtime_config.indent(&format!("Size: {} bytes", artifact.size))?;
    runtime_config.indent(&format!("SHA256: {}", artifact.checksum))?;
    runtime_config.success("OK!")?;

    Ok(0)
}

/// Startup checks and settings resolution. Nothing is written to disk here.
async fn prepare(args: &Args, runtime_config: &RuntimeConfig) -> Result<Settings> {
    check_host_os()?;

    let project_root = args.project_dir.absolutize()?.into_owned();
    let overrides = args.manifest_overrides();

    let manifest = match load_manifest(&project_root) {
        Ok(manifest) => manifest,
        Err(ManifestError::Read { ref source, .. })
            if source.kind() == std::io::ErrorKind::NotFound && overrides.is_complete() =>
        {
            log::debug!("No package.json in {}, using flags only", project_root.display());
            PackageJson::default()
        }
        Err(e) => return Err(e.into()),
    };
    let resolved = manifest.resolve(&overrides)?;

    let mut toolchain = detect_toolchain(&project_root, &args.tool_overrides())?;
    let runtime = probe_runtime(&toolchain.node).await?;
    check_runtime_version(&runtime.version)?;
    toolchain.runtime_image = Some(runtime.exec_path);

    runtime_config.verbose_println(&format!("Project: {}", project_root.display()))?;
    runtime_config.verbose_println(&format!(
        "Node.js: {} ({})",
        runtime.version,
        toolchain.runtime_image().display()
    ))?;
    runtime_config.verbose_println(&format!("Entry: {}", resolved.entry_in.display()))?;
    if let Some(script) = &resolved.build_script {
        runtime_config.verbose_println(&format!("Build script: {script}"))?;
    }
    runtime_config.verbose_println(&format!("Injector: {}", toolchain.injector.command_line(&[])))?;

    let settings = SettingsBuilder::new()
        .project_root(&project_root)
        .app_name(resolved.app_name)
        .entry_in(&resolved.entry_in)
        .entry_out(args.entry_out.clone())
        .build_dir(&args.source)
        .assets_dir(&args.assets)
        .skip_build(resolved.build_script.is_none())
        .toolchain(toolchain)
        .build()?;

    Ok(settings)
}
