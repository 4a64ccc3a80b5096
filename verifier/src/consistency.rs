//! Version consistency across the workspace's manifests.

use crate::manifest::DeclaredVersion;
use std::collections::BTreeSet;
use std::io::Write;

use crate::output::write_line;

/// Outcome of comparing every declared version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConsistency {
    /// Every present manifest declares the same version.
    Consistent {
        /// The single shared version.
        version: String,
    },
    /// Zero manifests were read, or at least two versions differ.
    Inconsistent {
        /// Every package-to-version pairing, for diagnosis.
        declared: Vec<DeclaredVersion>,
    },
}

impl VersionConsistency {
    /// Returns `true` if exactly one version was declared.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent { .. })
    }

    /// The shared version, or an empty string when inconsistent.
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Consistent { version } => version,
            Self::Inconsistent { .. } => "",
        }
    }
}

/// Check that all declared versions are identical.
///
/// An empty input is inconsistent: a run that found no manifests has no
/// version to verify wheels against. So is a single shared version that is
/// the empty string.
///
/// # Examples
///
/// ```
/// use release_verifier::consistency::check_version_consistency;
/// use release_verifier::manifest::DeclaredVersion;
///
/// let declared = vec![
///     DeclaredVersion { package: "mloda-testing".into(), version: "0.5.0".to_owned() },
///     DeclaredVersion { package: "mloda-registry".into(), version: "0.5.0".to_owned() },
/// ];
/// let outcome = check_version_consistency(declared);
/// assert!(outcome.is_consistent());
/// assert_eq!(outcome.version(), "0.5.0");
/// ```
#[must_use]
pub fn check_version_consistency(declared: Vec<DeclaredVersion>) -> VersionConsistency {
    let unique: BTreeSet<&str> = declared.iter().map(|d| d.version.as_str()).collect();
    let single = if unique.len() == 1 {
        unique.into_iter().next().map(str::to_owned)
    } else {
        None
    };

    match single {
        Some(version) if !version.is_empty() => VersionConsistency::Consistent { version },
        _ => VersionConsistency::Inconsistent { declared },
    }
}

/// Write the mismatch diagnosis: one line per package and its version.
pub fn report_mismatch(declared: &[DeclaredVersion], out: &mut dyn Write) {
    write_line(out, "Version mismatch detected:");
    for entry in declared {
        write_line(out, format!("  {}: {}", entry.package, entry.version));
    }
}
