//! Startup checks that must pass before anything touches the disk.

use crate::bundler::ToolCommand;
use semver::Version;
use std::{ffi::OsString, path::PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// The only host operating system SEA bundling is supported on.
pub const SUPPORTED_OS: &str = "linux";

/// Minimum Node.js major version with single executable application support.
pub const MIN_RUNTIME_MAJOR: u64 = 20;

/// Preflight failures. Each one stops the run with exit code 1.
#[derive(Error, Debug)]
pub enum PreflightError {
    /// Host OS other than Linux
    #[error("Current OS is {os} {arch}. For now this only supports linux x64")]
    UnsupportedOs {
        /// `std::env::consts::OS`
        os: String,
        /// `std::env::consts::ARCH`
        arch: String,
    },

    /// Runtime older than the minimum
    #[error("Current Node.js version is {version}. The required version is >= {required}")]
    UnsupportedRuntime {
        /// Detected version
        version: Version,
        /// Minimum major version
        required: u64,
    },

    /// `node --version` printed something that is not a version
    #[error("Cannot parse Node.js version from {raw:?}: {source}")]
    InvalidRuntimeVersion {
        /// Raw output
        raw: String,
        /// Parse error
        #[source]
        source: semver::Error,
    },

    /// `node --version` could not be run or failed
    #[error("Failed to query Node.js version with `{command}`: {reason}")]
    RuntimeProbeFailed {
        /// Command line
        command: String,
        /// What went wrong
        reason: String,
    },
}

/// Checks the host operating system.
pub fn check_host_os() -> Result<(), PreflightError> {
    check_os(std::env::consts::OS, std::env::consts::ARCH)
}

fn check_os(os: &str, arch: &str) -> Result<(), PreflightError> {
    if os == SUPPORTED_OS {
        Ok(())
    } else {
        Err(PreflightError::UnsupportedOs {
            os: os.to_string(),
            arch: arch.to_string(),
        })
    }
}

/// Parses `node --version` output such as `v20.11.1`.
pub fn parse_runtime_version(raw: &str) -> Result<Version, PreflightError> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).map_err(|source| {
        PreflightError::InvalidRuntimeVersion {
            raw: raw.to_string(),
            source,
        }
    })
}

/// Requires at least [`MIN_RUNTIME_MAJOR`].
pub fn check_runtime_version(version: &Version) -> Result<(), PreflightError> {
    if version.major >= MIN_RUNTIME_MAJOR {
        Ok(())
    } else {
        Err(PreflightError::UnsupportedRuntime {
            version: version.clone(),
            required: MIN_RUNTIME_MAJOR,
        })
    }
}

/// Script printing the runtime version and its own executable path.
const RUNTIME_PROBE_SCRIPT: &str = "console.log(process.version);console.log(process.execPath)";

/// What the runtime reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// `process.version`
    pub version: Version,
    /// `process.execPath`, the real binary even when `node` is a shim
    pub exec_path: PathBuf,
}

/// Parses the two lines printed by the runtime probe script.
pub fn parse_runtime_info(raw: &str) -> Result<RuntimeInfo, PreflightError> {
    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());
    let version = parse_runtime_version(lines.next().unwrap_or_default())?;
    let exec_path = lines
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| PreflightError::RuntimeProbeFailed {
            command: "process.execPath".to_string(),
            reason: format!("no executable path in output {raw:?}"),
        })?;

    Ok(RuntimeInfo { version, exec_path })
}

/// Asks the runtime for its version and executable path.
pub async fn probe_runtime(node: &ToolCommand) -> Result<RuntimeInfo, PreflightError> {
    let args = [OsString::from("-e"), OsString::from(RUNTIME_PROBE_SCRIPT)];
    let command = node.command_line(&args);

    let output = Command::new(node.program())
        .args(node.leading_args())
        .args(&args)
        .output()
        .await
        .map_err(|e| PreflightError::RuntimeProbeFailed {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(PreflightError::RuntimeProbeFailed {
            command,
            reason: format!(
                "exit code {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let info = parse_runtime_info(&String::from_utf8_lossy(&output.stdout))?;
    log::debug!(
        "Detected Node.js {} at {}",
        info.version,
        info.exec_path.display()
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_linux_only() {
        assert!(check_os("linux", "x86_64").is_ok());
        let err = check_os("macos", "aarch64").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Current OS is macos aarch64. For now this only supports linux x64"
        );
    }

    #[test]
    fn parses_node_version_output() {
        let version = parse_runtime_version("v20.11.1\n").unwrap();
        assert_eq!(version, Version::new(20, 11, 1));
        assert!(check_runtime_version(&version).is_ok());
    }

    #[test]
    fn rejects_old_runtime() {
        let version = parse_runtime_version("v18.19.0").unwrap();
        let err = check_runtime_version(&version).unwrap_err();
        assert!(err.to_string().contains(">= 20"));
    }

    #[test]
    fn accepts_newer_majors_and_prereleases() {
        let version = parse_runtime_version("v22.0.0-nightly20240101abcdef").unwrap();
        assert!(check_runtime_version(&version).is_ok());
    }

    #[test]
    fn garbage_version_is_error() {
        assert!(matches!(
            parse_runtime_version("node: command not found"),
            Err(PreflightError::InvalidRuntimeVersion { .. })
        ));
    }

    #[test]
    fn parses_version_and_exec_path() {
        let info = parse_runtime_info("v20.11.1\n/opt/node/bin/node\n").unwrap();
        assert_eq!(info.version, Version::new(20, 11, 1));
        assert_eq!(info.exec_path, PathBuf::from("/opt/node/bin/node"));
    }

    #[test]
    fn missing_exec_path_is_error() {
        assert!(matches!(
            parse_runtime_info("v20.11.1\n"),
            Err(PreflightError::RuntimeProbeFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shim_reports_real_runtime_path() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("real-node");
        let shim = tmp.path().join("node");
        std::fs::write(
            &real,
            "#!/bin/sh\n[ \"$1\" = -e ] && { echo v21.6.2; echo \"$0\"; }\n",
        )
        .unwrap();
        std::fs::write(&shim, format!("#!/bin/sh\nexec {} \"$@\"\n", real.display())).unwrap();
        for path in [&real, &shim] {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let info = probe_runtime(&ToolCommand::new(&shim)).await.unwrap();
        assert_eq!(info.version, Version::new(21, 6, 2));
        assert_eq!(info.exec_path, real);
    }
}
