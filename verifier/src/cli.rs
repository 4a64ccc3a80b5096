//! CLI argument definitions for `verify-builds`.
//!
//! Kept apart from the entrypoint so the argument surface can be tested
//! without running a verification.

use camino::Utf8PathBuf;
use clap::Parser;

/// Verify that every mloda package builds a correct wheel.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "verify-builds")]
#[command(version, about)]
#[command(long_about = concat!(
    "Verify that every mloda package builds a correct wheel.\n\n",
    "All packages must declare the same version in their pyproject.toml. Each ",
    "package is then built with `uv build` into a scratch directory, and the ",
    "resulting wheels are checked for the declared version, the expected ",
    "dependency wiring, and intact namespace packaging.\n\n",
    "Settings are read from verify-builds.toml in the workspace root when ",
    "present.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Verify the workspace in the current directory:\n",
    "    $ verify-builds\n\n",
    "  Verify another checkout and emit a JSON report:\n",
    "    $ verify-builds -C ../mloda --json\n",
))]
pub struct Cli {
    /// Configuration file [default: <DIR>/verify-builds.toml when present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Workspace root [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Print a JSON report on stdout; progress moves to stderr.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
