//! External command execution.
//!
//! The build tool is the verifier's only subprocess. Running it behind the
//! [`CommandExecutor`] trait lets tests substitute a scripted fake that writes
//! wheel fixtures instead of invoking `uv`.

use crate::error::{Result, VerifierError};
use log::debug;
use std::process::{Command, Output};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// The call blocks until the command exits.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use release_verifier::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("uv", &["--version".to_owned()])?;
    /// assert!(output.status.success());
    /// # Ok::<(), release_verifier::error::VerifierError>(())
    /// ```
    fn run(&self, program: &str, args: &[String]) -> Result<Output>;
}

/// Executes commands on the host system, capturing stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        debug!("running {program} {}", args.join(" "));
        Command::new(program)
            .args(args)
            .output()
            .map_err(VerifierError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn system_executor_captures_exit_status() {
        let executor = SystemCommandExecutor;
        let output = executor
            .run("sh", &["-c".to_owned(), "echo oops >&2; exit 3".to_owned()])
            .expect("sh should spawn");

        assert_eq!(output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "oops");
    }

    #[test]
    fn system_executor_reports_missing_program() {
        let executor = SystemCommandExecutor;
        let err = executor
            .run("definitely-not-a-real-build-tool", &[])
            .expect_err("missing program should fail to spawn");

        assert!(matches!(err, VerifierError::Io(_)));
    }
}
