//! Error types for bundling operations.
//!
//! Every stage of the pipeline reports failures through [`Error`]. Helpers in
//! this module attach file paths and human readable context to lower level
//! errors so the final message names what was being done when it failed.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while assembling a single executable application.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Free-form error, usually raised through [`bail!`](crate::bail)
    #[error("{0}")]
    GenericError(String),

    /// Error wrapped with a description of the failed operation
    #[error("{context}: {source}")]
    Context {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File system error tied to a concrete path
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path the operation touched
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        error: io::Error,
    },

    /// Plain I/O error
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// JSON serialization error
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Directory traversal error
    #[error("failed to walk directory: {0}")]
    WalkDirError(#[from] walkdir::Error),

    /// An external tool could not be started at all
    #[error("failed to run `{command}`: {error}")]
    CommandSpawn {
        /// Command line that was attempted
        command: String,
        /// Underlying spawn error
        #[source]
        error: io::Error,
    },

    /// An external tool ran but exited unsuccessfully
    #[error("command \"{command}\" exited with {}", describe_exit(.code))]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// The runtime executable has no SEA sentinel fuse to flip
    #[error(
        "sentinel fuse {fuse} not found in {}; the runtime does not support single executable applications",
        path.display()
    )]
    SentinelNotFound {
        /// Executable that was inspected
        path: PathBuf,
        /// Fuse string that was searched for
        fuse: &'static str,
    },

    /// A path cannot be written into JSON
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

/// Attaches file system context to I/O results.
pub trait ErrorExt<T> {
    /// Converts an I/O error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Attaches a free-form description to results and options.
pub trait Context<T> {
    /// Wraps the failure with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}
