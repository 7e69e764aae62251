//! Top-level error types for the SEA bundler CLI.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use crate::{metadata::ManifestError, preflight::PreflightError};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Startup check failures
    #[error("{0}")]
    Preflight(#[from] PreflightError),

    /// package.json errors
    #[error("{0}")]
    Manifest(#[from] ManifestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as StageError;

        match self {
            BundlerError::Cli(_) => vec!["Run with --help to see the accepted flags".to_string()],
            BundlerError::Preflight(PreflightError::UnsupportedOs { .. }) => {
                vec!["Run the bundler on a Linux x64 host".to_string()]
            }
            BundlerError::Preflight(_) => vec![
                "Install Node.js 20 or newer, or point --node at a suitable runtime".to_string(),
            ],
            BundlerError::Manifest(ManifestError::MissingFields { .. }) => {
                vec!["Edit package.json or pass the listed command line flags".to_string()]
            }
            BundlerError::Manifest(_) => {
                vec!["Run the bundler from the project directory or pass --project-dir".to_string()]
            }
            BundlerError::Bundler(StageError::CommandFailed { .. }) => {
                vec!["Check the output of the failed command above".to_string()]
            }
            BundlerError::Bundler(StageError::CommandSpawn { .. }) => vec![
                "Install the project's dev dependencies (npm install --save-dev @vercel/ncc postject)"
                    .to_string(),
            ],
            BundlerError::Bundler(StageError::SentinelNotFound { .. }) => vec![
                "Use an official Node.js build; distribution builds may omit SEA support".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MissingField;

    #[test]
    fn manifest_errors_display_without_prefix() {
        let err = BundlerError::from(ManifestError::MissingFields {
            fields: vec![MissingField::Main],
        });
        assert!(err.to_string().starts_with("package.json is missing required fields"));
        assert_eq!(err.recovery_suggestions().len(), 1);
    }

    #[test]
    fn command_failures_suggest_checking_output() {
        let err = BundlerError::from(crate::bundler::Error::CommandFailed {
            command: "npm run build".into(),
            code: Some(1),
        });
        assert!(err.to_string().contains("npm run build"));
        assert!(err.recovery_suggestions()[0].contains("failed command"));
    }
}
