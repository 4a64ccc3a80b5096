//! Wheel builds and per-package wheel verification.
//!
//! This module drives the external build tool for one package at a time,
//! locates the produced wheel, and checks its embedded version. Failures are
//! returned as [`Finding`]s so the caller can continue with the next package.

use crate::command::CommandExecutor;
use crate::error::Result;
use crate::finding::{Finding, truncate_output};
use crate::package::PackageName;
use crate::wheel::BuiltWheel;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};

/// Configuration for the external build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before `--package <name> --out-dir <dir>`.
    pub args: Vec<String>,
    /// Maximum number of stderr characters kept in a build failure.
    pub stderr_limit: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "uv".to_owned(),
            args: vec!["build".to_owned()],
            stderr_limit: 500,
        }
    }
}

/// Result of building and checking one package.
#[derive(Debug)]
pub enum PackageOutcome {
    /// The wheel exists and declares the expected version.
    Verified(BuiltWheel),
    /// The package failed a build or wheel check.
    Rejected(Finding),
}

/// Builds packages and verifies the wheels they produce.
pub struct Builder<'a> {
    config: &'a BuildConfig,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Builder<'a> {
    /// Create a builder running `config` through `executor`.
    #[must_use]
    pub const fn new(config: &'a BuildConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self { config, executor }
    }

    /// Full argument list for building `package` into `out_dir`.
    #[must_use]
    pub fn command_args(&self, package: &PackageName, out_dir: &Utf8Path) -> Vec<String> {
        let mut args = self.config.args.clone();
        args.extend([
            "--package".to_owned(),
            package.to_string(),
            "--out-dir".to_owned(),
            out_dir.to_string(),
        ]);
        args
    }

    /// Build `package` into `out_dir` and check the wheel declares `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `out_dir` exists but cannot be listed.
    /// Build and wheel problems are reported as [`PackageOutcome::Rejected`].
    pub fn build_package(
        &self,
        package: &PackageName,
        out_dir: &Utf8Path,
        expected: &str,
    ) -> Result<PackageOutcome> {
        let args = self.command_args(package, out_dir);
        let output = match self.executor.run(&self.config.program, &args) {
            Ok(output) => output,
            Err(err) => {
                return Ok(PackageOutcome::Rejected(Finding::BuildNotStarted {
                    package: package.clone(),
                    reason: err.to_string(),
                }));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(PackageOutcome::Rejected(Finding::BuildFailed {
                package: package.clone(),
                stderr: truncate_output(&stderr, self.config.stderr_limit),
            }));
        }

        let Some(wheel_path) = find_wheel(out_dir, package)? else {
            return Ok(PackageOutcome::Rejected(Finding::NoWheel {
                package: package.clone(),
            }));
        };

        let wheel = match BuiltWheel::open(&wheel_path) {
            Ok(wheel) => wheel,
            Err(err) => {
                return Ok(PackageOutcome::Rejected(Finding::UnreadableWheel {
                    package: package.clone(),
                    wheel: wheel_path.file_name().unwrap_or_default().to_owned(),
                    reason: err.to_string(),
                }));
            }
        };

        if wheel.contents.core_metadata().declares_version(expected) {
            Ok(PackageOutcome::Verified(wheel))
        } else {
            Ok(PackageOutcome::Rejected(Finding::VersionMismatch {
                package: package.clone(),
                expected: expected.to_owned(),
            }))
        }
    }
}

/// Locate the wheel built for `package` inside `dir`.
///
/// Returns `None` if `dir` does not exist or holds no matching wheel. When
/// several match, the lexicographically first is chosen.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be read.
pub fn find_wheel(dir: &Utf8Path, package: &PackageName) -> Result<Option<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut matches: Vec<Utf8PathBuf> = dir
        .read_dir_utf8()?
        .filter_map(std::result::Result::ok)
        .filter(|entry| package.matches_wheel_file(entry.file_name()))
        .map(|entry| entry.path().to_owned())
        .collect();
    matches.sort();
    debug!("wheels for {package} in {dir}: {matches:?}");

    Ok(matches.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;
    use crate::error::VerifierError;
    use crate::test_utils::{
        BuildScript, ScriptedBuildTool, WheelFixture, failure_output, success_output,
    };
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn out_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("mloda-testing")).expect("utf8 path");
        (dir, path)
    }

    fn package() -> PackageName {
        PackageName::from("mloda-testing")
    }

    #[test]
    fn command_args_follow_uv_shape() {
        let config = BuildConfig::default();
        let executor = MockCommandExecutor::new();
        let builder = Builder::new(&config, &executor);

        let args = builder.command_args(&package(), Utf8Path::new("/tmp/out"));

        assert_eq!(
            args,
            ["build", "--package", "mloda-testing", "--out-dir", "/tmp/out"]
        );
    }

    #[rstest]
    fn build_failure_truncates_stderr(out_dir: (TempDir, Utf8PathBuf)) {
        let (_dir, out) = out_dir;
        let config = BuildConfig {
            stderr_limit: 5,
            ..BuildConfig::default()
        };
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|program, args| {
                program == "uv" && args.first().map(String::as_str) == Some("build")
            })
            .times(1)
            .returning(|_, _| Ok(failure_output("0123456789")));

        let outcome = Builder::new(&config, &executor)
            .build_package(&package(), &out, "0.5.0")
            .expect("build outcome");

        assert!(matches!(
            outcome,
            PackageOutcome::Rejected(Finding::BuildFailed { stderr, .. }) if stderr == "01234"
        ));
    }

    #[rstest]
    fn spawn_failure_is_a_finding(out_dir: (TempDir, Utf8PathBuf)) {
        let (_dir, out) = out_dir;
        let config = BuildConfig::default();
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_, _| {
            Err(VerifierError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "uv not found",
            )))
        });

        let outcome = Builder::new(&config, &executor)
            .build_package(&package(), &out, "0.5.0")
            .expect("build outcome");

        assert!(matches!(
            outcome,
            PackageOutcome::Rejected(Finding::BuildNotStarted { .. })
        ));
    }

    #[rstest]
    fn successful_build_without_wheel_is_reported(out_dir: (TempDir, Utf8PathBuf)) {
        let (_dir, out) = out_dir;
        let config = BuildConfig::default();
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_, _| Ok(success_output()));

        let outcome = Builder::new(&config, &executor)
            .build_package(&package(), &out, "0.5.0")
            .expect("build outcome");

        assert!(matches!(
            outcome,
            PackageOutcome::Rejected(Finding::NoWheel { .. })
        ));
    }

    #[rstest]
    #[case::matching("0.5.0", true)]
    #[case::mismatched("0.5.1", false)]
    fn version_check_gates_verification(
        out_dir: (TempDir, Utf8PathBuf),
        #[case] built_version: &str,
        #[case] verified: bool,
    ) {
        let (_dir, out) = out_dir;
        let config = BuildConfig::default();
        let tool = ScriptedBuildTool::new().with(
            "mloda-testing",
            BuildScript::Wheel(WheelFixture::compliant("mloda-testing", built_version)),
        );

        let outcome = Builder::new(&config, &tool)
            .build_package(&package(), &out, "0.5.0")
            .expect("build outcome");

        assert_eq!(matches!(outcome, PackageOutcome::Verified(_)), verified);
    }

    #[rstest]
    fn corrupt_wheel_is_reported(out_dir: (TempDir, Utf8PathBuf)) {
        let (_dir, out) = out_dir;
        let config = BuildConfig::default();
        let tool = ScriptedBuildTool::new().with("mloda-testing", BuildScript::Corrupt);

        let outcome = Builder::new(&config, &tool)
            .build_package(&package(), &out, "0.5.0")
            .expect("build outcome");

        assert!(matches!(
            outcome,
            PackageOutcome::Rejected(Finding::UnreadableWheel { .. })
        ));
    }

    #[test]
    fn find_wheel_ignores_longer_sibling_names() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        std::fs::write(root.join("mloda_community_example_a-0.5.0-py3-none-any.whl"), b"")
            .expect("write sibling");
        std::fs::write(root.join("mloda_community_example-0.5.0.tar.gz"), b"")
            .expect("write sdist");

        let found = find_wheel(&root, &PackageName::from("mloda-community-example"))
            .expect("list dir");

        assert!(found.is_none());
    }

    #[test]
    fn find_wheel_on_missing_dir_is_none() {
        let found = find_wheel(Utf8Path::new("/definitely/not/here"), &package()).expect("no error");
        assert!(found.is_none());
    }
}
