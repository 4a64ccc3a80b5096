//! Package names and descriptors for the verified workspace.
//!
//! This module provides the [`PackageName`] newtype and the
//! [`PackageDescriptor`] pairing of a distribution name with the path of its
//! `pyproject.toml`. The default descriptor list mirrors the mloda workspace.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A distribution name as declared in `pyproject.toml` (e.g. `mloda-testing`).
///
/// The wrapper keeps package names distinct from arbitrary strings such as
/// versions or paths. No normalisation is applied on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the package name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the wheel filename stem for this distribution.
    ///
    /// Wheel filenames replace hyphens with underscores, so
    /// `mloda-community-example` becomes `mloda_community_example`.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_verifier::package::PackageName;
    ///
    /// let name = PackageName::from("mloda-community-example-a");
    /// assert_eq!(name.wheel_stem(), "mloda_community_example_a");
    /// ```
    #[must_use]
    pub fn wheel_stem(&self) -> String {
        self.0.replace('-', "_")
    }

    /// Check whether `file_name` is a wheel built for this distribution.
    ///
    /// The stem must be followed directly by the `-` that separates it from
    /// the version, so a shorter sibling name never claims a longer one's
    /// wheel.
    #[must_use]
    pub fn matches_wheel_file(&self, file_name: &str) -> bool {
        let stem = self.wheel_stem();
        file_name
            .strip_prefix(stem.as_str())
            .is_some_and(|rest| rest.starts_with('-') && rest.ends_with(".whl"))
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A package to verify: its distribution name and manifest location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageDescriptor {
    /// Distribution name passed to the build tool.
    pub name: PackageName,
    /// Path to the package's `pyproject.toml`, relative to the workspace root.
    pub manifest: Utf8PathBuf,
}

impl PackageDescriptor {
    /// Create a descriptor from a name and manifest path.
    #[must_use]
    pub fn new(name: impl Into<PackageName>, manifest: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            manifest: manifest.into(),
        }
    }

    /// Resolve the manifest path against `root`.
    #[must_use]
    pub fn manifest_path(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.manifest)
    }
}

/// Packages of the mloda workspace in build order.
pub const DEFAULT_PACKAGES: &[(&str, &str)] = &[
    ("mloda-registry", "mloda/registry/pyproject.toml"),
    ("mloda-testing", "mloda/testing/pyproject.toml"),
    ("mloda-community", "mloda/community/pyproject.toml"),
    ("mloda-enterprise", "mloda/enterprise/pyproject.toml"),
    (
        "mloda-community-example",
        "mloda/community/feature_groups/example/pyproject.toml",
    ),
    (
        "mloda-enterprise-example",
        "mloda/enterprise/feature_groups/example/pyproject.toml",
    ),
    (
        "mloda-community-example-a",
        "mloda/community/feature_groups/example/example_a/pyproject.toml",
    ),
    (
        "mloda-community-example-b",
        "mloda/community/feature_groups/example/example_b/pyproject.toml",
    ),
];

/// Build the default descriptor list from [`DEFAULT_PACKAGES`].
#[must_use]
pub fn default_packages() -> Vec<PackageDescriptor> {
    DEFAULT_PACKAGES
        .iter()
        .map(|&(name, manifest)| PackageDescriptor::new(name, manifest))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::own_wheel("mloda-community-example", "mloda_community_example-0.5.0-py3-none-any.whl", true)]
    #[case::longer_sibling("mloda-community-example", "mloda_community_example_a-0.5.0-py3-none-any.whl", false)]
    #[case::sdist("mloda-testing", "mloda_testing-0.5.0.tar.gz", false)]
    #[case::other_package("mloda-testing", "mloda_registry-0.5.0-py3-none-any.whl", false)]
    fn matches_wheel_file_variants(
        #[case] name: &str,
        #[case] file_name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(PackageName::from(name).matches_wheel_file(file_name), expected);
    }

    #[test]
    fn default_packages_preserve_order() {
        let packages = default_packages();
        assert_eq!(packages.len(), DEFAULT_PACKAGES.len());
        assert_eq!(
            packages.first().map(|p| p.name.as_str()),
            Some("mloda-registry")
        );
        assert_eq!(
            packages.last().map(|p| p.name.as_str()),
            Some("mloda-community-example-b")
        );
    }

    #[test]
    fn manifest_path_joins_root() {
        let descriptor = PackageDescriptor::new("mloda-testing", "mloda/testing/pyproject.toml");
        assert_eq!(
            descriptor.manifest_path(Utf8Path::new("/work")),
            Utf8PathBuf::from("/work/mloda/testing/pyproject.toml")
        );
    }
}
