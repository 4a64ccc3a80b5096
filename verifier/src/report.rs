//! Final verification report.

use crate::finding::Finding;
use crate::manifest::DeclaredVersion;
use serde::Serialize;

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every package built and passed every check.
    Passed,
    /// Manifests were missing or declared different versions; nothing was built.
    VersionMismatch,
    /// At least one finding was recorded.
    Failed,
}

/// Summary of a verification run, also emitted as JSON with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Overall status.
    pub status: RunStatus,
    /// The shared version, when the consistency check passed.
    pub version: Option<String>,
    /// Number of configured packages.
    pub package_count: usize,
    /// Declared versions, populated when they disagree.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declared: Vec<DeclaredVersion>,
    /// File names of wheels that passed the version check.
    pub verified_wheels: Vec<String>,
    /// Every finding, in the order recorded.
    pub findings: Vec<Finding>,
    /// Number of build artefacts removed after success.
    pub cleaned_artifacts: usize,
}

impl VerificationReport {
    /// Process exit code: 0 on success, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Passed => 0,
            RunStatus::VersionMismatch | RunStatus::Failed => 1,
        }
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageName;
    use rstest::rstest;

    fn report(status: RunStatus) -> VerificationReport {
        VerificationReport {
            status,
            version: Some("0.5.0".to_owned()),
            package_count: 6,
            declared: Vec::new(),
            verified_wheels: vec!["mloda_testing-0.5.0-py3-none-any.whl".to_owned()],
            findings: Vec::new(),
            cleaned_artifacts: 0,
        }
    }

    #[rstest]
    #[case::passed(RunStatus::Passed, 0)]
    #[case::mismatch(RunStatus::VersionMismatch, 1)]
    #[case::failed(RunStatus::Failed, 1)]
    fn exit_code_is_binary(#[case] status: RunStatus, #[case] expected: i32) {
        assert_eq!(report(status).exit_code(), expected);
    }

    #[test]
    fn json_report_includes_findings() {
        let mut failed = report(RunStatus::Failed);
        failed.findings.push(Finding::NoWheel {
            package: PackageName::from("mloda-registry"),
        });

        let json: serde_json::Value =
            serde_json::from_str(&failed.to_json().expect("serialise")).expect("parse json");

        assert_eq!(json["status"], "failed");
        assert_eq!(json["version"], "0.5.0");
        assert_eq!(json["findings"][0]["kind"], "no_wheel");
        assert!(json.get("declared").is_none());
    }
}
