//! External process execution.
//!
//! Stage tools run with stdin, stdout and stderr inherited from this process
//! so their output streams straight to the terminal. Nothing is captured;
//! only the exit status decides success.

use crate::bundler::{Error, Result, settings::ToolCommand};
use std::{ffi::OsStr, path::Path, process::Stdio};
use tokio::process::Command;

/// Runs `tool` with `args` in `cwd` and waits for it to exit.
///
/// Returns [`Error::CommandSpawn`] when the process cannot be started and
/// [`Error::CommandFailed`] on a non-zero exit status.
pub async fn run_tool<I, S>(tool: &ToolCommand, args: I, cwd: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();
    let command_line = tool.command_line(&args);

    log::debug!("Running `{}` in {}", command_line, cwd.display());

    let status = Command::new(tool.program())
        .args(tool.leading_args())
        .args(&args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|error| Error::CommandSpawn {
            command: command_line.clone(),
            error,
        })?;

    if !status.success() {
        return Err(Error::CommandFailed {
            command: command_line,
            code: status.code(),
        });
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_command_returns_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = ToolCommand::new("sh");
        run_tool(&tool, ["-c", "echo ok > marker"], tmp.path())
            .await
            .unwrap();
        assert!(tmp.path().join("marker").exists());
    }

    #[tokio::test]
    async fn non_zero_exit_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = ToolCommand::new("sh");
        let err = run_tool(&tool, ["-c", "exit 7"], tmp.path())
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { command, code } => {
                assert_eq!(code, Some(7));
                assert!(command.starts_with("sh -c"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = ToolCommand::new(tmp.path().join("does-not-exist"));
        let err = run_tool(&tool, Vec::<String>::new(), tmp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandSpawn { .. }));
    }

    #[tokio::test]
    async fn leading_args_precede_call_args() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = ToolCommand::with_args("sh", ["-c"]);
        run_tool(&tool, ["echo \"$0\" > marker", "first"], tmp.path())
            .await
            .unwrap();
        let marker = std::fs::read_to_string(tmp.path().join("marker")).unwrap();
        assert_eq!(marker.trim(), "first");
    }
}
