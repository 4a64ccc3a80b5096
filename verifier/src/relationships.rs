//! Inter-package dependency wiring.
//!
//! The example feature groups are split across an aggregator distribution
//! and leaf distributions. Installing `aggregator[all]` must pull in every
//! leaf, and every leaf must pull in the aggregator it extends.

use crate::finding::Finding;
use crate::package::PackageName;
use crate::wheel::BuiltWheel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Expected dependency wiring between built packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyRules {
    /// Package that bundles the others behind an extra.
    pub aggregator: PackageName,
    /// Name of the aggregating extra.
    pub extra: String,
    /// Packages the extra must require.
    pub extra_members: Vec<PackageName>,
    /// Packages that must depend on the aggregator unconditionally.
    pub dependents: Vec<PackageName>,
}

impl Default for DependencyRules {
    fn default() -> Self {
        let leaves = vec![
            PackageName::from("mloda-community-example-a"),
            PackageName::from("mloda-community-example-b"),
        ];
        Self {
            aggregator: PackageName::from("mloda-community-example"),
            extra: "all".to_owned(),
            extra_members: leaves.clone(),
            dependents: leaves,
        }
    }
}

impl DependencyRules {
    /// Check the rules against the wheels that built successfully.
    ///
    /// Packages missing from `wheels` are skipped; their absence has already
    /// been reported by the build step.
    #[must_use]
    pub fn check(&self, wheels: &BTreeMap<PackageName, BuiltWheel>) -> Vec<Finding> {
        let mut findings = Vec::new();

        if let Some(wheel) = wheels.get(&self.aggregator) {
            findings.extend(self.check_aggregator(wheel));
        } else {
            debug!("skipping extra checks: {} was not built", self.aggregator);
        }

        for dependent in &self.dependents {
            let Some(wheel) = wheels.get(dependent) else {
                debug!("skipping dependency check: {dependent} was not built");
                continue;
            };
            if !wheel
                .contents
                .core_metadata()
                .requires_unconditionally(self.aggregator.as_str())
            {
                findings.push(Finding::MissingDependency {
                    package: dependent.clone(),
                    dependency: self.aggregator.clone(),
                });
            }
        }

        findings
    }

    fn check_aggregator(&self, wheel: &BuiltWheel) -> Vec<Finding> {
        let metadata = wheel.contents.core_metadata();
        let mut findings = Vec::new();

        if !metadata.provides_extra(&self.extra) {
            findings.push(Finding::MissingExtra {
                package: self.aggregator.clone(),
                extra: self.extra.clone(),
            });
        }

        findings.extend(
            self.extra_members
                .iter()
                .filter(|member| !metadata.requires_under_extra(member.as_str(), &self.extra))
                .map(|member| Finding::MissingExtraMember {
                    package: self.aggregator.clone(),
                    extra: self.extra.clone(),
                    member: member.clone(),
                }),
        );

        findings
    }
}
