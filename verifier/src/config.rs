//! Verifier configuration.
//!
//! Every setting has a default matching the mloda workspace, so the tool runs
//! without any configuration file. A `verify-builds.toml` in the workspace
//! root (or a file passed with `--config`) overrides individual sections:
//!
//! ```toml
//! missing_manifest = "fail"
//!
//! [build]
//! program = "uv"
//! args = ["build", "--wheel"]
//!
//! [[packages]]
//! name = "mloda-testing"
//! manifest = "mloda/testing/pyproject.toml"
//! ```

use crate::builder::BuildConfig;
use crate::error::{Result, VerifierError};
use crate::manifest::MissingManifestPolicy;
use crate::namespace::NamespaceLayout;
use crate::package::{PackageDescriptor, default_packages};
use crate::relationships::DependencyRules;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};

/// File name looked up in the workspace root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "verify-builds.toml";

/// Build artefacts removed after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupConfig {
    /// Directories searched (non-recursively) for `*.egg-info` directories.
    pub egg_info_dirs: Vec<Utf8PathBuf>,
    /// Paths removed outright when present.
    pub nested_artifacts: Vec<Utf8PathBuf>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            egg_info_dirs: vec![Utf8PathBuf::from("."), Utf8PathBuf::from("mloda")],
            nested_artifacts: vec![Utf8PathBuf::from("mloda/mloda")],
        }
    }
}

/// Complete verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Packages to verify, in build order.
    pub packages: Vec<PackageDescriptor>,
    /// Treatment of packages whose manifest is absent.
    pub missing_manifest: MissingManifestPolicy,
    /// External build tool settings.
    pub build: BuildConfig,
    /// Shared namespace directories.
    pub namespaces: NamespaceLayout,
    /// Expected dependency wiring.
    pub relationships: DependencyRules,
    /// Artefacts removed after success.
    pub cleanup: CleanupConfig,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            missing_manifest: MissingManifestPolicy::default(),
            build: BuildConfig::default(),
            namespaces: NamespaceLayout::default(),
            relationships: DependencyRules::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl VerifierConfig {
    /// Parse configuration text. `path` is used only for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`VerifierError::InvalidConfig`] if the text is not valid TOML
    /// or contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use release_verifier::config::VerifierConfig;
    /// use release_verifier::manifest::MissingManifestPolicy;
    ///
    /// let config = VerifierConfig::parse("missing_manifest = \"fail\"\n", Utf8Path::new("x.toml"))?;
    /// assert_eq!(config.missing_manifest, MissingManifestPolicy::Fail);
    /// assert_eq!(config.build.program, "uv");
    /// # Ok::<(), release_verifier::error::VerifierError>(())
    /// ```
    pub fn parse(contents: &str, path: &Utf8Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| VerifierError::InvalidConfig {
            path: path.to_owned(),
            reason: e.to_string().trim().to_owned(),
        })
    }

    /// Load configuration for a run rooted at `root`.
    ///
    /// An explicit path must exist. Without one, `verify-builds.toml` under
    /// `root` is used when present and the defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`VerifierError::ConfigNotFound`] for a missing explicit path,
    /// or a read/parse error for an existing file.
    pub fn load(root: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if path.is_file() => path.to_owned(),
            Some(path) => {
                return Err(VerifierError::ConfigNotFound {
                    path: path.to_owned(),
                });
            }
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} under {root}; using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        debug!("loading configuration from {path}");
        let contents = std::fs::read_to_string(&path)?;
        Self::parse(&contents, &path)
    }
}
