//! Verification pipeline orchestration.
//!
//! This module sequences the checks: version consistency, per-package builds
//! inside a scratch directory, relationship and namespace checks over the
//! wheels that built, a source-tree namespace check, and finally cleanup.

use crate::builder::{Builder, PackageOutcome};
use crate::cleanup::cleanup_build_artifacts;
use crate::command::CommandExecutor;
use crate::config::VerifierConfig;
use crate::consistency::{VersionConsistency, check_version_consistency, report_mismatch};
use crate::error::{Result, VerifierError};
use crate::finding::Finding;
use crate::manifest::read_declared_versions;
use crate::output::{
    cleanup_message, declared_version_message, success_message, wheel_ok_message, write_findings,
    write_line,
};
use crate::package::PackageName;
use crate::report::{RunStatus, VerificationReport};
use crate::wheel::BuiltWheel;
use camino::Utf8Path;
use log::{debug, info};
use std::collections::BTreeMap;
use std::io::Write;

/// Result of the build-and-inspect phase.
#[derive(Debug, Default)]
pub struct BuildPhase {
    /// Wheel file names that passed the version check, in build order.
    pub verified_wheels: Vec<String>,
    /// Findings recorded while building and inspecting.
    pub findings: Vec<Finding>,
}

/// A configured verification run over one workspace.
pub struct Verifier<'a> {
    root: &'a Utf8Path,
    config: &'a VerifierConfig,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Verifier<'a> {
    /// Create a verifier for the workspace at `root`.
    #[must_use]
    pub const fn new(
        root: &'a Utf8Path,
        config: &'a VerifierConfig,
        executor: &'a dyn CommandExecutor,
    ) -> Self {
        Self {
            root,
            config,
            executor,
        }
    }

    /// Run every check, writing progress to `out`.
    ///
    /// Per-package failures do not stop the run; they end up in
    /// [`VerificationReport::findings`].
    ///
    /// # Errors
    ///
    /// Returns an error for fatal conditions: unreadable manifests, a missing
    /// manifest under the `fail` policy, scratch directory failures, or
    /// cleanup failures.
    pub fn run(&self, out: &mut dyn Write) -> Result<VerificationReport> {
        let package_count = self.config.packages.len();
        let declared = read_declared_versions(
            self.root,
            &self.config.packages,
            self.config.missing_manifest,
        )?;

        let version = match check_version_consistency(declared) {
            VersionConsistency::Consistent { version } => version,
            VersionConsistency::Inconsistent { declared } => {
                report_mismatch(&declared, out);
                return Ok(mismatch_report(package_count, declared));
            }
        };
        write_line(out, declared_version_message(&version));

        let BuildPhase {
            verified_wheels,
            mut findings,
        } = self.build_and_inspect(&version, out)?;

        findings.extend(self.config.namespaces.check_source_tree(self.root));

        let mut report = VerificationReport {
            status: RunStatus::Failed,
            version: Some(version),
            package_count,
            declared: Vec::new(),
            verified_wheels,
            findings,
            cleaned_artifacts: 0,
        };

        if !report.findings.is_empty() {
            write_findings(out, &report.findings);
            return Ok(report);
        }

        report.cleaned_artifacts = cleanup_build_artifacts(self.root, &self.config.cleanup)?;
        if let Some(message) = cleanup_message(report.cleaned_artifacts) {
            write_line(out, "");
            write_line(out, message);
        }

        write_line(out, "");
        write_line(
            out,
            success_message(package_count, report.version.as_deref().unwrap_or_default()),
        );
        report.status = RunStatus::Passed;
        info!("verified {package_count} packages");
        Ok(report)
    }

    /// Build every package into a scratch directory and inspect the wheels.
    ///
    /// The scratch directory is removed when this returns, by any path.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be created or listed.
    pub fn build_and_inspect(&self, version: &str, out: &mut dyn Write) -> Result<BuildPhase> {
        let scratch = tempfile::Builder::new()
            .prefix("verify-builds-")
            .tempdir()?;
        let scratch_root =
            Utf8Path::from_path(scratch.path()).ok_or_else(|| VerifierError::NonUtf8Path {
                path: scratch.path().display().to_string(),
            })?;
        debug!("building into {scratch_root}");

        let builder = Builder::new(&self.config.build, self.executor);
        let mut phase = BuildPhase::default();
        let mut wheels: BTreeMap<PackageName, BuiltWheel> = BTreeMap::new();

        for descriptor in &self.config.packages {
            write_line(out, "");
            write_line(out, format!("Building {}...", descriptor.name));

            let out_dir = scratch_root.join(descriptor.name.as_str());
            match builder.build_package(&descriptor.name, &out_dir, version)? {
                PackageOutcome::Verified(wheel) => {
                    write_line(out, wheel_ok_message(wheel.file_name()));
                    phase.verified_wheels.push(wheel.file_name().to_owned());
                    wheels.insert(descriptor.name.clone(), wheel);
                }
                PackageOutcome::Rejected(finding) => {
                    debug!("{finding}");
                    phase.findings.push(finding);
                }
            }
        }

        write_line(out, "");
        write_line(out, "Verifying dependency relationships...");
        let dependency_findings = self.config.relationships.check(&wheels);
        if dependency_findings.is_empty() {
            write_line(out, "  \u{2713} package dependencies correct");
        }
        phase.findings.extend(dependency_findings);

        write_line(out, "");
        write_line(out, "Verifying namespace packaging...");
        let namespace_findings: Vec<Finding> = wheels
            .iter()
            .flat_map(|(name, wheel)| self.config.namespaces.check_wheel(name, &wheel.contents))
            .collect();
        if namespace_findings.is_empty() {
            write_line(out, "  \u{2713} wheel namespaces correct");
        }
        phase.findings.extend(namespace_findings);

        Ok(phase)
    }
}

fn mismatch_report(
    package_count: usize,
    declared: Vec<crate::manifest::DeclaredVersion>,
) -> VerificationReport {
    VerificationReport {
        status: RunStatus::VersionMismatch,
        version: None,
        package_count,
        declared,
        verified_wheels: Vec::new(),
        findings: Vec::new(),
        cleaned_artifacts: 0,
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
