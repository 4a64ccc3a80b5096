//! Declared-version extraction from `pyproject.toml` manifests.
//!
//! Reads each package's manifest and pulls `project.version` out of it. A
//! manifest without that key reports the literal [`UNKNOWN_VERSION`], which
//! never matches a real version and therefore fails the consistency check.

use crate::error::{Result, VerifierError};
use crate::package::{PackageDescriptor, PackageName};
use camino::Utf8Path;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Version reported for manifests that declare no `project.version`.
pub const UNKNOWN_VERSION: &str = "unknown";

/// How to treat a package whose manifest file does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingManifestPolicy {
    /// Leave the package out of the version check.
    #[default]
    Skip,
    /// Abort the run with [`VerifierError::MissingManifest`].
    Fail,
}

/// A package's name paired with the version its manifest declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredVersion {
    /// The package the version belongs to.
    pub package: PackageName,
    /// The declared version string.
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
struct Pyproject {
    #[serde(default)]
    project: ProjectTable,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectTable {
    version: Option<String>,
}

/// Extract `project.version` from manifest text.
///
/// Returns [`UNKNOWN_VERSION`] when the `project` table or its `version` key is
/// absent.
///
/// # Errors
///
/// Returns [`VerifierError::InvalidManifest`] if `contents` is not valid TOML.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use release_verifier::manifest::parse_declared_version;
///
/// let text = "[project]\nname = \"mloda-testing\"\nversion = \"0.5.0\"\n";
/// let version = parse_declared_version(text, Utf8Path::new("pyproject.toml"))?;
/// assert_eq!(version, "0.5.0");
/// # Ok::<(), release_verifier::error::VerifierError>(())
/// ```
pub fn parse_declared_version(contents: &str, path: &Utf8Path) -> Result<String> {
    let parsed: Pyproject =
        toml::from_str(contents).map_err(|e| VerifierError::InvalidManifest {
            path: path.to_owned(),
            reason: e.to_string().trim().to_owned(),
        })?;

    Ok(parsed
        .project
        .version
        .unwrap_or_else(|| UNKNOWN_VERSION.to_owned()))
}

/// Read the declared version of every package whose manifest exists.
///
/// Results follow descriptor order. Missing manifests are handled according
/// to `policy`.
///
/// # Errors
///
/// Returns an error if a manifest cannot be read or parsed, or if a manifest
/// is missing under [`MissingManifestPolicy::Fail`].
pub fn read_declared_versions(
    root: &Utf8Path,
    packages: &[PackageDescriptor],
    policy: MissingManifestPolicy,
) -> Result<Vec<DeclaredVersion>> {
    let mut declared = Vec::with_capacity(packages.len());

    for descriptor in packages {
        let path = descriptor.manifest_path(root);

        if !path.is_file() {
            match policy {
                MissingManifestPolicy::Skip => {
                    warn!("skipping {}: no manifest at {path}", descriptor.name);
                    continue;
                }
                MissingManifestPolicy::Fail => {
                    return Err(VerifierError::MissingManifest {
                        package: descriptor.name.to_string(),
                        path,
                    });
                }
            }
        }

        let contents = std::fs::read_to_string(&path)?;
        let version = parse_declared_version(&contents, &path)?;
        debug!("{} declares version {version}", descriptor.name);

        declared.push(DeclaredVersion {
            package: descriptor.name.clone(),
            version,
        });
    }

    Ok(declared)
}
