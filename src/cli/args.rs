//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation of
//! the values that end up as file names in the build directory.

use crate::bundler::{DEFAULT_ASSETS_DIR, DEFAULT_BUILD_DIR, DEFAULT_ENTRY_OUT, ToolOverrides};
use crate::metadata::ManifestOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Package a Node.js project into a single executable
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_sea",
    version,
    about = "Package a Node.js project into a single executable application",
    long_about = "Packages a Node.js project into one native Linux executable.

Runs the project build, bundles the entry with @vercel/ncc, writes a SEA config
embedding every file under the assets directory, generates the SEA blob with
node and injects it into a copy of the node executable with postject.

Usage:
  kodegen_bundler_sea
  kodegen_bundler_sea --skip-build --entry-in=dist/server.js --name=server
  kodegen_bundler_sea --source=out/sea --assets=static

Exit code 0 = executable guaranteed to exist at <source>/<name>."
)]
pub struct Args {
    /// Skip running `npm run build`
    #[arg(long)]
    pub skip_build: bool,

    /// Build output root, relative to the project directory
    #[arg(long, value_name = "PATH", default_value = DEFAULT_BUILD_DIR)]
    pub source: PathBuf,

    /// Directory whose files are embedded as SEA assets
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Bundler input entry (default: `main` from package.json)
    #[arg(long, value_name = "PATH")]
    pub entry_in: Option<PathBuf>,

    /// File name of the bundled entry inside the build root
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ENTRY_OUT)]
    pub entry_out: String,

    /// Executable name (default: `name` from package.json, without scope)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Project directory containing package.json
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Node.js executable (default: `node` on PATH)
    #[arg(long, value_name = "PATH", env = "KODEGEN_SEA_NODE")]
    pub node: Option<PathBuf>,

    /// postject executable (default: node_modules/.bin/postject, then `npx postject`)
    #[arg(long, value_name = "PATH")]
    pub injector: Option<PathBuf>,

    /// Print resolved configuration details
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_file_name("--name", name)?;
        }
        validate_file_name("--entry-out", &self.entry_out)?;

        if self.source.as_os_str().is_empty() {
            return Err("--source cannot be empty".to_string());
        }

        Ok(())
    }

    /// Manifest values supplied or waived on the command line
    pub fn manifest_overrides(&self) -> ManifestOverrides {
        ManifestOverrides {
            name: self.name.clone(),
            entry_in: self.entry_in.clone(),
            skip_build: self.skip_build,
        }
    }

    /// Tool paths supplied on the command line
    pub fn tool_overrides(&self) -> ToolOverrides {
        ToolOverrides {
            node: self.node.clone(),
            injector: self.injector.clone(),
        }
    }
}

fn validate_file_name(flag: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{flag} cannot be empty"));
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(format!(
            "{flag} must be a plain file name, got {value:?}"
        ));
    }
    Ok(())
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("kodegen_bundler_sea").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_follow_project_conventions() {
        let args = parse(&[]);
        assert!(!args.skip_build);
        assert_eq!(args.source, PathBuf::from("build"));
        assert_eq!(args.assets, PathBuf::from("assets"));
        assert_eq!(args.entry_out, "index.js");
        assert_eq!(args.entry_in, None);
        assert_eq!(args.name, None);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn accepts_equals_syntax() {
        let args = parse(&[
            "--skip-build",
            "--source=out/sea",
            "--assets=static/files",
            "--entry-in=dist/server.js",
            "--entry-out=server.js",
            "--name=server",
        ]);
        assert!(args.skip_build);
        assert_eq!(args.source, PathBuf::from("out/sea"));
        assert_eq!(args.assets, PathBuf::from("static/files"));
        assert_eq!(args.entry_in, Some(PathBuf::from("dist/server.js")));
        assert_eq!(args.entry_out, "server.js");
        assert_eq!(args.name.as_deref(), Some("server"));

        let overrides = args.manifest_overrides();
        assert!(overrides.skip_build);
        assert_eq!(overrides.name.as_deref(), Some("server"));
    }

    #[test]
    fn rejects_name_with_path_separator() {
        let args = parse(&["--name=a/b"]);
        assert!(args.validate().unwrap_err().contains("--name"));
    }

    #[test]
    fn rejects_empty_entry_out() {
        let args = parse(&["--entry-out="]);
        assert!(args.validate().unwrap_err().contains("--entry-out"));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Args::try_parse_from(["kodegen_bundler_sea", "--verbose", "--quiet"]);
        assert!(result.is_err());
    }
}
