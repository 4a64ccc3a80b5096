//! Release verification for the mloda namespace-package workspace.
//!
//! The `verify-builds` binary checks that every package in the workspace
//! declares the same version, builds each one into a scratch directory, and
//! inspects the resulting wheels before a release is cut. The library is
//! exposed so the checks can be driven programmatically and under test.
//!
//! # Modules
//!
//! - [`builder`] - Invocation of the external wheel build tool
//! - [`cleanup`] - Removal of build leftovers after a successful run
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - Subprocess execution abstraction
//! - [`config`] - Configuration file loading and defaults
//! - [`consistency`] - Cross-package version agreement
//! - [`error`] - Fatal error types
//! - [`finding`] - Non-fatal verification failures
//! - [`manifest`] - `pyproject.toml` version extraction
//! - [`metadata`] - Wheel core metadata parsing
//! - [`namespace`] - Shared namespace directory checks
//! - [`output`] - Progress and summary messages
//! - [`package`] - Package names and descriptors
//! - [`pipeline`] - Orchestration of a full run
//! - [`relationships`] - Inter-package dependency checks
//! - [`report`] - Final report and JSON rendering
//! - [`wheel`] - Wheel archive inspection

pub mod builder;
pub mod cleanup;
pub mod cli;
pub mod command;
pub mod config;
pub mod consistency;
pub mod error;
pub mod finding;
pub mod manifest;
pub mod metadata;
pub mod namespace;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod relationships;
pub mod report;
pub mod wheel;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
