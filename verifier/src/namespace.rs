//! PEP 420 namespace compliance.
//!
//! Several distributions install into the same `mloda` package tree. Each
//! shared directory must stay an implicit namespace package: a concrete
//! `__init__.py` at any merge point shadows the other distributions' modules.
//! The same rule is checked against built wheels and against the source tree.

use crate::finding::Finding;
use crate::package::PackageName;
use crate::wheel::WheelContents;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

const INIT_FILE: &str = "__init__.py";

/// The shared namespace directories of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamespaceLayout {
    /// Root namespace package, also the expected `top_level.txt` entry.
    pub root: String,
    /// Sub-namespace directories, relative to the root.
    pub sub_namespaces: Vec<String>,
}

impl Default for NamespaceLayout {
    fn default() -> Self {
        let sub_namespaces = ["community", "enterprise"]
            .into_iter()
            .flat_map(|tier| {
                std::iter::once(tier.to_owned()).chain(
                    ["feature_groups", "compute_frameworks", "extenders"]
                        .into_iter()
                        .map(move |kind| format!("{tier}/{kind}")),
                )
            })
            .collect();

        Self {
            root: "mloda".to_owned(),
            sub_namespaces,
        }
    }
}

impl NamespaceLayout {
    /// Every namespace directory, root first, as `/`-separated relative paths.
    #[must_use]
    pub fn directories(&self) -> Vec<String> {
        std::iter::once(self.root.clone())
            .chain(
                self.sub_namespaces
                    .iter()
                    .map(|sub| format!("{}/{}", self.root, sub.trim_matches('/'))),
            )
            .collect()
    }

    /// Archive paths at which an initializer would break the namespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_verifier::namespace::NamespaceLayout;
    ///
    /// let layout = NamespaceLayout {
    ///     root: "mloda".to_owned(),
    ///     sub_namespaces: vec!["community".to_owned()],
    /// };
    /// assert_eq!(
    ///     layout.forbidden_init_paths(),
    ///     vec!["mloda/__init__.py", "mloda/community/__init__.py"]
    /// );
    /// ```
    #[must_use]
    pub fn forbidden_init_paths(&self) -> Vec<String> {
        self.directories()
            .into_iter()
            .map(|dir| format!("{dir}/{INIT_FILE}"))
            .collect()
    }

    /// Check one wheel's top-level listing and namespace initializers.
    #[must_use]
    pub fn check_wheel(&self, package: &PackageName, contents: &WheelContents) -> Vec<Finding> {
        let mut findings = Vec::new();

        if !contents.lists_top_level(&self.root) {
            findings.push(Finding::MissingTopLevel {
                package: package.clone(),
                namespace: self.root.clone(),
            });
        }

        findings.extend(
            self.forbidden_init_paths()
                .into_iter()
                .filter(|path| contents.contains_file(path))
                .map(|path| Finding::WheelNamespaceInit {
                    package: package.clone(),
                    path,
                }),
        );

        findings
    }

    /// Check the working tree under `root_dir` for namespace initializers.
    #[must_use]
    pub fn check_source_tree(&self, root_dir: &Utf8Path) -> Vec<Finding> {
        self.forbidden_init_paths()
            .into_iter()
            .map(Utf8PathBuf::from)
            .filter(|rel| root_dir.join(rel).is_file())
            .map(|path| Finding::SourceNamespaceInit { path })
            .collect()
    }
}
