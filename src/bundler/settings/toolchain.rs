//! External tools invoked by the pipeline.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

/// A program plus any arguments that always precede the per-call arguments.
///
/// `npx --yes postject` is represented as program `npx` with leading args
/// `["--yes", "postject"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ToolCommand {
    /// Creates a tool invoked without leading arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Creates a tool whose invocations always start with `args`.
    pub fn with_args<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self {
            program: program.into(),
            leading_args: args
                .into_iter()
                .map(|a| a.as_ref().to_os_string())
                .collect(),
        }
    }

    /// Returns the program path or name.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the arguments placed before every call's own arguments.
    pub fn leading_args(&self) -> &[OsString] {
        &self.leading_args
    }

    /// Renders the full command line for logs and error messages.
    pub fn command_line(&self, args: &[OsString]) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.leading_args.iter().map(OsString::as_os_str))
            .chain(args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The set of external tools one pipeline run uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    /// Package manager used for the project build script (`npm run build`)
    pub npm: ToolCommand,

    /// `@vercel/ncc` CLI used to bundle the entry into a single file
    pub ncc: ToolCommand,

    /// Node.js runtime command; generates the blob
    pub node: ToolCommand,

    /// `postject` injector writing the blob into the copied executable
    pub injector: ToolCommand,

    /// The runtime's own executable image (`process.execPath`), copied as
    /// the base of the app. `None` copies `node.program()`, which is only
    /// right when that program is the real binary and not a shim.
    pub runtime_image: Option<PathBuf>,
}

impl Toolchain {
    /// Returns the executable copied as the base of the app.
    pub fn runtime_image(&self) -> &Path {
        self.runtime_image
            .as_deref()
            .unwrap_or_else(|| self.node.program())
    }
}
