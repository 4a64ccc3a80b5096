//! Output formatting for the verifier CLI.
//!
//! Progress and results are written to an injected writer rather than
//! printed directly, so the orchestrator can be exercised against an
//! in-memory buffer.

use crate::finding::Finding;
use std::fmt::Display;
use std::io::Write;

/// Write a single line, ignoring write failures.
///
/// Progress output is best-effort; a closed stdout must not turn a passing
/// verification into a failing one.
pub fn write_line(out: &mut dyn Write, message: impl Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Line announcing the shared version once the consistency check passes.
#[must_use]
pub fn declared_version_message(version: &str) -> String {
    format!("All packages declare version: {version}")
}

/// Line reporting a verified wheel.
#[must_use]
pub fn wheel_ok_message(wheel_file: &str) -> String {
    format!("  \u{2713} {wheel_file}")
}

/// Format the closing success line.
///
/// # Examples
///
/// ```
/// use release_verifier::output::success_message;
///
/// assert_eq!(
///     success_message(6, "0.5.0"),
///     "\u{2705} All 6 packages built with version 0.5.0"
/// );
/// ```
#[must_use]
pub fn success_message(count: usize, version: &str) -> String {
    let noun = if count == 1 { "package" } else { "packages" };
    format!("\u{2705} All {count} {noun} built with version {version}")
}

/// Format the artefact cleanup notice, or `None` when nothing was removed.
#[must_use]
pub fn cleanup_message(count: usize) -> Option<String> {
    (count > 0).then(|| format!("Cleaned up {count} build artifact(s)"))
}

/// Write the accumulated findings as a bulleted error list.
pub fn write_findings(out: &mut dyn Write, findings: &[Finding]) {
    write_line(out, "");
    write_line(out, "\u{274c} Errors:");
    for finding in findings {
        write_line(out, format!("  - {finding}"));
    }
}
