//! `verify-builds` CLI entrypoint.
//!
//! Runs the release verification over a workspace checkout and exits with
//! status 0 only when every package built a correct wheel.

use camino::Utf8PathBuf;
use clap::Parser;
use release_verifier::cli::Cli;
use release_verifier::command::SystemCommandExecutor;
use release_verifier::config::VerifierConfig;
use release_verifier::error::{Result, VerifierError};
use release_verifier::pipeline::Verifier;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
    let root = resolve_root(cli.directory.clone())?;
    let config = VerifierConfig::load(&root, cli.config.as_deref())?;
    let executor = SystemCommandExecutor;
    let verifier = Verifier::new(&root, &config, &executor);

    if !cli.json {
        return verifier.run(stdout).map(|report| report.exit_code());
    }

    let report = verifier.run(stderr)?;
    writeln!(stdout, "{}", report.to_json()?)
        .map_err(|source| VerifierError::WriteFailed { source })?;
    Ok(report.exit_code())
}

/// Use `--directory` when given, otherwise the current directory.
fn resolve_root(directory: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(dir) = directory {
        return Ok(dir);
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| VerifierError::NonUtf8Path {
        path: e.into_path_buf().display().to_string(),
    })
}

fn exit_code_for_run_result(result: Result<i32>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
