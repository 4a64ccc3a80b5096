//! Error types for the release verifier.
//!
//! [`VerifierError`] covers the fatal conditions that stop a run before or
//! outside the per-package checks: unreadable configuration, malformed
//! manifests, and I/O failures. Per-package problems found while building and
//! inspecting wheels are not errors in this sense; they are collected as
//! [`crate::finding::Finding`] values and reported together at the end.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Fatal errors that abort a verification run.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// A manifest exists but could not be parsed as TOML.
    #[error("invalid manifest at {path}: {reason}")]
    InvalidManifest {
        /// Path to the offending `pyproject.toml`.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// A manifest is missing and the configuration forbids skipping it.
    #[error("manifest for {package} not found at {path}")]
    MissingManifest {
        /// Package whose manifest is missing.
        package: String,
        /// Path where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// The verifier configuration file could not be parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file {path} not found")]
    ConfigNotFound {
        /// Path that was requested.
        path: Utf8PathBuf,
    },

    /// A filesystem path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// A cleanup glob pattern was rejected.
    #[error("invalid cleanup pattern {pattern}: {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// Description of the pattern error.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// The JSON report could not be serialised.
    #[error("failed to serialise report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type alias using [`VerifierError`].
pub type Result<T> = std::result::Result<T, VerifierError>;
