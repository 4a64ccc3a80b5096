//! Removal of build leftovers after a successful run.
//!
//! setuptools drops `*.egg-info` directories next to the manifests it builds
//! from, and the bundled packages can leave a nested `mloda/mloda` copy
//! behind. Both are deleted once every check has passed; after a failed run
//! they are left in place for inspection.

use crate::config::CleanupConfig;
use crate::error::{Result, VerifierError};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// Delete the configured artefacts under `root`, returning how many were removed.
///
/// # Errors
///
/// Returns an error if a search pattern is invalid or a directory cannot be
/// removed.
pub fn cleanup_build_artifacts(root: &Utf8Path, config: &CleanupConfig) -> Result<usize> {
    let mut removed = 0;

    for dir in &config.egg_info_dirs {
        for egg_info in egg_info_dirs(&root.join(dir))? {
            debug!("removing {egg_info}");
            std::fs::remove_dir_all(&egg_info)?;
            removed += 1;
        }
    }

    for nested in &config.nested_artifacts {
        let path = root.join(nested);
        if path.exists() {
            debug!("removing {path}");
            std::fs::remove_dir_all(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// List `*.egg-info` directories directly inside `dir`.
fn egg_info_dirs(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let pattern = format!("{}/*.egg-info", glob::Pattern::escape(dir.as_str()));
    let entries = glob::glob(&pattern).map_err(|e| VerifierError::InvalidPattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(std::io::Error::from)?;
        if !path.is_dir() {
            continue;
        }
        let utf8 = Utf8PathBuf::try_from(path).map_err(|e| VerifierError::NonUtf8Path {
            path: e.into_path_buf().display().to_string(),
        })?;
        found.push(utf8);
    }
    Ok(found)
}
