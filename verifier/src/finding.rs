//! Non-fatal verification failures.
//!
//! Every check that can fail for one package without stopping the others
//! produces a [`Finding`]. The orchestrator collects them in order and the
//! run fails if any were recorded.

use crate::package::PackageName;
use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;

/// A single verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The build tool exited unsuccessfully.
    BuildFailed {
        /// Package that failed to build.
        package: PackageName,
        /// Truncated standard error of the build tool.
        stderr: String,
    },
    /// The build tool could not be started at all.
    BuildNotStarted {
        /// Package whose build could not start.
        package: PackageName,
        /// Description of the spawn failure.
        reason: String,
    },
    /// The build succeeded but no matching wheel was found.
    NoWheel {
        /// Package without a wheel.
        package: PackageName,
    },
    /// The wheel could not be opened as a zip archive.
    UnreadableWheel {
        /// Package whose wheel is unreadable.
        package: PackageName,
        /// Wheel file name.
        wheel: String,
        /// Description of the archive error.
        reason: String,
    },
    /// The wheel metadata does not declare the expected version.
    VersionMismatch {
        /// Package with the wrong version.
        package: PackageName,
        /// The version every manifest declared.
        expected: String,
    },
    /// The aggregator does not provide the expected extra.
    MissingExtra {
        /// The aggregator package.
        package: PackageName,
        /// The missing extra name.
        extra: String,
    },
    /// A member package is not required under the aggregator's extra.
    MissingExtraMember {
        /// The aggregator package.
        package: PackageName,
        /// The extra that should list the member.
        extra: String,
        /// The member package that is not listed.
        member: PackageName,
    },
    /// A leaf package does not depend on the aggregator.
    MissingDependency {
        /// The leaf package.
        package: PackageName,
        /// The dependency it should declare.
        dependency: PackageName,
    },
    /// `top_level.txt` is absent or does not list the root namespace.
    MissingTopLevel {
        /// Package whose wheel lacks the entry.
        package: PackageName,
        /// The expected top-level name.
        namespace: String,
    },
    /// A wheel ships an initializer inside a shared namespace directory.
    WheelNamespaceInit {
        /// Package whose wheel contains the initializer.
        package: PackageName,
        /// Archive path of the initializer.
        path: String,
    },
    /// The source tree contains an initializer in a namespace directory.
    SourceNamespaceInit {
        /// Filesystem path of the initializer.
        path: Utf8PathBuf,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildFailed { package, stderr } => {
                write!(f, "{package}: build failed\n{stderr}")
            }
            Self::BuildNotStarted { package, reason } => {
                write!(f, "{package}: build tool could not be started: {reason}")
            }
            Self::NoWheel { package } => write!(f, "{package}: no wheel produced"),
            Self::UnreadableWheel {
                package,
                wheel,
                reason,
            } => write!(f, "{package}: unreadable wheel {wheel}: {reason}"),
            Self::VersionMismatch { package, expected } => write!(
                f,
                "{package}: version mismatch in wheel (expected {expected})"
            ),
            Self::MissingExtra { package, extra } => {
                write!(f, "{package}: missing '{extra}' extra")
            }
            Self::MissingExtraMember {
                package,
                extra,
                member,
            } => write!(f, "{package}: '{extra}' extra missing {member}"),
            Self::MissingDependency {
                package,
                dependency,
            } => write!(f, "{package}: missing dependency on {dependency}"),
            Self::MissingTopLevel { package, namespace } => {
                write!(f, "{package}: top_level.txt does not list '{namespace}'")
            }
            Self::WheelNamespaceInit { package, path } => {
                write!(f, "{package}: wheel contains {path} (breaks namespace package)")
            }
            Self::SourceNamespaceInit { path } => {
                write!(f, "{path}: namespace directory must not contain __init__.py")
            }
        }
    }
}

/// Truncate build output to at most `limit` characters.
///
/// Counts characters rather than bytes so multi-byte output is never split
/// mid-codepoint.
#[must_use]
pub fn truncate_output(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
