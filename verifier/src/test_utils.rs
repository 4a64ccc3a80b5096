//! Shared test utilities for the verifier crate.
//!
//! [`WheelFixture`] writes small but structurally real wheels, and
//! [`ScriptedBuildTool`] stands in for `uv build`, dropping those wheels into
//! the requested output directory.

use crate::command::CommandExecutor;
use crate::error::{Result, VerifierError};
use crate::package::PackageDescriptor;
use crate::relationships::DependencyRules;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::process::{ExitStatus, Output};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Builder for in-memory wheel archives.
#[derive(Debug, Clone, Default)]
pub struct WheelFixture {
    name: String,
    version: String,
    headers: Vec<String>,
    top_level: Option<Vec<String>>,
    files: Vec<(String, String)>,
    with_metadata: bool,
}

impl WheelFixture {
    /// A wheel with METADATA declaring `name` and `version`.
    #[must_use]
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: version.to_owned(),
            with_metadata: true,
            ..Self::default()
        }
    }

    /// A wheel with no METADATA entry at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: "empty".to_owned(),
            version: "0".to_owned(),
            ..Self::default()
        }
    }

    /// A namespace-compliant wheel listing `mloda` as its top-level package.
    #[must_use]
    pub fn compliant(name: &str, version: &str) -> Self {
        let module = format!("mloda/{}/core.py", name.replace('-', "_"));
        Self::new(name, version)
            .top_level(&["mloda"])
            .file(&module, "")
    }

    /// The `mloda-community-example` aggregator with a complete `all` extra.
    #[must_use]
    pub fn community_example_aggregator(version: &str) -> Self {
        Self::compliant("mloda-community-example", version)
            .provides_extra("all")
            .requires_dist("mloda-community-example-a; extra == \"all\"")
            .requires_dist("mloda-community-example-b; extra == \"all\"")
    }

    /// Add a `Provides-Extra` header.
    #[must_use]
    pub fn provides_extra(mut self, extra: &str) -> Self {
        self.headers.push(format!("Provides-Extra: {extra}"));
        self
    }

    /// Add a `Requires-Dist` header.
    #[must_use]
    pub fn requires_dist(mut self, requirement: &str) -> Self {
        self.headers.push(format!("Requires-Dist: {requirement}"));
        self
    }

    /// Add a `top_level.txt` entry with the given names.
    #[must_use]
    pub fn top_level(mut self, names: &[&str]) -> Self {
        self.top_level = Some(names.iter().map(|&n| n.to_owned()).collect());
        self
    }

    /// Add an arbitrary archive entry.
    #[must_use]
    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.files.push((path.to_owned(), contents.to_owned()));
        self
    }

    /// The conventional wheel file name for this fixture.
    #[must_use]
    pub fn wheel_file_name(&self) -> String {
        format!(
            "{}-{}-py3-none-any.whl",
            self.name.replace('-', "_"),
            self.version
        )
    }

    fn dist_info(&self) -> String {
        format!("{}-{}.dist-info", self.name.replace('-', "_"), self.version)
    }

    fn metadata_text(&self) -> String {
        let mut text = format!(
            "Metadata-Version: 2.4\nName: {}\nVersion: {}\n",
            self.name, self.version
        );
        for header in &self.headers {
            text.push_str(header);
            text.push('\n');
        }
        text
    }

    /// Serialise the fixture as a zip archive.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory archive cannot be written.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut entries = self.files.clone();
        let dist_info = self.dist_info();
        if self.with_metadata {
            entries.push((format!("{dist_info}/METADATA"), self.metadata_text()));
        }
        if let Some(names) = &self.top_level {
            entries.push((format!("{dist_info}/top_level.txt"), names.join("\n")));
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, contents) in &entries {
            writer
                .start_file(path.as_str(), SimpleFileOptions::default())
                .unwrap_or_else(|e| panic!("failed to start zip entry: {e}"));
            writer
                .write_all(contents.as_bytes())
                .unwrap_or_else(|e| panic!("failed to write zip entry: {e}"));
        }
        writer
            .finish()
            .unwrap_or_else(|e| panic!("failed to finish zip archive: {e}"))
            .into_inner()
    }

    /// Write the archive to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_to(&self, path: &Utf8Path) {
        std::fs::write(path, self.to_bytes())
            .unwrap_or_else(|e| panic!("failed to write wheel fixture {path}: {e}"));
    }
}

/// What the scripted build tool does for one package.
#[derive(Debug, Clone)]
pub enum BuildScript {
    /// Exit successfully and write this wheel into the output directory.
    Wheel(WheelFixture),
    /// Exit successfully without producing a wheel.
    NoWheel,
    /// Exit successfully and write bytes that are not a zip archive.
    Corrupt,
    /// Exit with status 1 and this stderr.
    Fail(String),
}

/// A fake `uv build` that follows a per-package script.
///
/// Expects the argument shape `<args..> --package <name> --out-dir <dir>` and
/// records every invocation for later assertions.
#[derive(Debug, Default)]
pub struct ScriptedBuildTool {
    scripts: HashMap<String, BuildScript>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedBuildTool {
    /// Creates a tool with no scripted packages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the behaviour for `package`.
    #[must_use]
    pub fn with(mut self, package: &str, script: BuildScript) -> Self {
        self.scripts.insert(package.to_owned(), script);
        self
    }

    /// A tool that builds a correct wheel at `version` for every package.
    ///
    /// The aggregator named by the default [`DependencyRules`] gets its `all`
    /// extra, and its dependents declare a requirement on it.
    #[must_use]
    pub fn passing(packages: &[PackageDescriptor], version: &str) -> Self {
        let rules = DependencyRules::default();
        packages.iter().fold(Self::new(), |tool, descriptor| {
            let name = descriptor.name.as_str();
            let fixture = if descriptor.name == rules.aggregator {
                WheelFixture::community_example_aggregator(version)
            } else if rules.dependents.contains(&descriptor.name) {
                WheelFixture::compliant(name, version)
                    .requires_dist(&format!("{}=={version}", rules.aggregator))
            } else {
                WheelFixture::compliant(name, version)
            };
            tool.with(name, BuildScript::Wheel(fixture))
        })
    }

    /// Argument lists of every invocation, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Packages the tool was asked to build, in call order.
    #[must_use]
    pub fn built_packages(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|args| flag_value(args, "--package"))
            .collect()
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

impl CommandExecutor for ScriptedBuildTool {
    fn run(&self, _program: &str, args: &[String]) -> Result<Output> {
        self.calls.borrow_mut().push(args.to_vec());

        let unexpected = || VerifierError::Io(std::io::Error::other("unexpected build invocation"));
        let package = flag_value(args, "--package").ok_or_else(unexpected)?;
        let out_dir = flag_value(args, "--out-dir").ok_or_else(unexpected)?;
        let script = self.scripts.get(&package).ok_or_else(unexpected)?;
        let out = Utf8Path::new(&out_dir);

        match script {
            BuildScript::Wheel(fixture) => {
                std::fs::create_dir_all(out)?;
                std::fs::write(out.join(fixture.wheel_file_name()), fixture.to_bytes())?;
                Ok(success_output())
            }
            BuildScript::NoWheel => Ok(success_output()),
            BuildScript::Corrupt => {
                std::fs::create_dir_all(out)?;
                let name = format!("{}-0.0.0-py3-none-any.whl", package.replace('-', "_"));
                std::fs::write(out.join(name), b"not a zip archive")?;
                Ok(success_output())
            }
            BuildScript::Fail(stderr) => Ok(failure_output(stderr)),
        }
    }
}

/// Six-package subset of the mloda workspace used by end-to-end tests.
#[must_use]
pub fn six_packages() -> Vec<PackageDescriptor> {
    [
        ("mloda-registry", "mloda/registry/pyproject.toml"),
        ("mloda-testing", "mloda/testing/pyproject.toml"),
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
    ]
    .into_iter()
    .map(|(name, manifest)| PackageDescriptor::new(name, manifest))
    .collect()
}

/// A throwaway workspace directory with helpers for writing manifests.
#[derive(Debug)]
pub struct TestWorkspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl TestWorkspace {
    /// Create an empty workspace.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or is not UTF-8.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp workspace: {e}"));
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf())
            .unwrap_or_else(|e| panic!("temp workspace path is not UTF-8: {e}"));
        Self { _dir: dir, root }
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write a `pyproject.toml` declaring `version` at `rel`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_manifest(&self, rel: &Utf8Path, name: &str, version: &str) {
        self.write_file(
            rel,
            &format!("[project]\nname = \"{name}\"\nversion = \"{version}\"\n"),
        );
    }

    /// Write manifests for every descriptor, all declaring `version`.
    pub fn write_manifests(&self, packages: &[PackageDescriptor], version: &str) {
        for descriptor in packages {
            self.write_manifest(&descriptor.manifest, descriptor.name.as_str(), version);
        }
    }

    /// Write `contents` at `rel`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_file(&self, rel: &Utf8Path, contents: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("failed to create {parent}: {e}"));
        }
        std::fs::write(&path, contents).unwrap_or_else(|e| panic!("failed to write {path}: {e}"));
    }

    /// Create the directory `rel` and its parents.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    pub fn create_dir(&self, rel: &Utf8Path) {
        let path = self.root.join(rel);
        std::fs::create_dir_all(&path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
