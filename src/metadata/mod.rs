//! Project metadata from `package.json`.
//!
//! Only three fields matter to the bundler: `name`, `main` and
//! `scripts.build`. Each can be supplied or made unnecessary by a command
//! line flag; validation reports every missing field at once.

use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// File name of the project manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// The subset of `package.json` the bundler reads.
#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
    /// Package name, possibly scoped (`@scope/name`)
    #[serde(default)]
    pub name: Option<String>,

    /// Entry point handed to the bundler
    #[serde(default)]
    pub main: Option<String>,

    /// npm scripts; only `build` is consulted
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// Command line values that replace or waive manifest fields.
#[derive(Debug, Default, Clone)]
pub struct ManifestOverrides {
    /// Replaces the app name derived from `name`
    pub name: Option<String>,
    /// Replaces `main`
    pub entry_in: Option<PathBuf>,
    /// Waives the `scripts.build` requirement
    pub skip_build: bool,
}

impl ManifestOverrides {
    /// True when no manifest field is needed at all.
    pub fn is_complete(&self) -> bool {
        non_empty(self.name.as_deref()).is_some()
            && self
                .entry_in
                .as_ref()
                .is_some_and(|path| !path.as_os_str().is_empty())
            && self.skip_build
    }
}

/// Values resolved from the manifest and its overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    /// Final executable name
    pub app_name: String,
    /// Bundler input entry
    pub entry_in: PathBuf,
    /// Build script, `None` when the build is skipped
    pub build_script: Option<String>,
}

/// A required manifest field that is absent and not overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// `name`
    Name,
    /// `main`
    Main,
    /// `scripts.build`
    BuildScript,
}

impl MissingField {
    /// JSON path of the field.
    pub fn field(&self) -> &'static str {
        match self {
            MissingField::Name => "name",
            MissingField::Main => "main",
            MissingField::BuildScript => "scripts.build",
        }
    }

    /// How to satisfy the requirement.
    pub fn hint(&self) -> &'static str {
        match self {
            MissingField::Name => "add a name property, or set the app name with --name",
            MissingField::Main => {
                "add a main property pointing to the build entry, or set it with --entry-in"
            }
            MissingField::BuildScript => {
                "add scripts.build to run the build, or skip the build with --skip-build"
            }
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field(), self.hint())
    }
}

/// Manifest loading and validation errors.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Manifest path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON of the expected shape
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Manifest path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Required fields are missing
    #[error("package.json is missing required fields:{}", list_missing(.fields))]
    MissingFields {
        /// Every missing field, in declaration order
        fields: Vec<MissingField>,
    },
}

fn list_missing(fields: &[MissingField]) -> String {
    fields.iter().map(|f| format!("\n  - {f}")).collect()
}

impl PackageJson {
    /// Parses manifest text.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolves bundler inputs, collecting every missing field.
    pub fn resolve(&self, overrides: &ManifestOverrides) -> Result<ResolvedManifest, ManifestError> {
        let mut missing = Vec::new();

        let app_name = match non_empty(overrides.name.as_deref()) {
            Some(name) => Some(name.to_string()),
            None => non_empty(self.name.as_deref()).and_then(app_name_from_package),
        };
        if app_name.is_none() {
            missing.push(MissingField::Name);
        }

        let entry_in = match &overrides.entry_in {
            Some(path) if !path.as_os_str().is_empty() => Some(path.clone()),
            _ => non_empty(self.main.as_deref()).map(PathBuf::from),
        };
        if entry_in.is_none() {
            missing.push(MissingField::Main);
        }

        let build_script = if overrides.skip_build {
            None
        } else {
            let script = non_empty(self.scripts.get("build").map(String::as_str));
            if script.is_none() {
                missing.push(MissingField::BuildScript);
            }
            script.map(str::to_string)
        };

        match (app_name, entry_in) {
            (Some(app_name), Some(entry_in)) if missing.is_empty() => Ok(ResolvedManifest {
                app_name,
                entry_in,
                build_script,
            }),
            _ => Err(ManifestError::MissingFields { fields: missing }),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Derives the executable name from a package name.
///
/// Scoped names keep only the segment after the last `/`:
/// `@scope/my-app` becomes `my-app`.
pub fn app_name_from_package(name: &str) -> Option<String> {
    name.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Loads `package.json` from `project_root`.
pub fn load_manifest(project_root: &Path) -> Result<PackageJson, ManifestError> {
    let path = project_root.join(MANIFEST_FILE_NAME);
    let text = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
        path: path.clone(),
        source,
    })?;
    PackageJson::from_json(&text, &path)
}
