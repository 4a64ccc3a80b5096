//! Behaviour-driven tests for the verification pipeline.
//!
//! Scenarios run the full pipeline against a temporary workspace, with the
//! scripted build tool standing in for `uv build`. Tests use the rstest-bdd
//! v0.5.0 mutable world pattern.

use camino::Utf8Path;
use release_verifier::config::VerifierConfig;
use release_verifier::package::PackageDescriptor;
use release_verifier::pipeline::Verifier;
use release_verifier::report::{RunStatus, VerificationReport};
use release_verifier::test_utils::{
    BuildScript, ScriptedBuildTool, TestWorkspace, WheelFixture, six_packages,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

#[derive(Default)]
struct VerificationWorld {
    workspace: Option<TestWorkspace>,
    packages: Vec<PackageDescriptor>,
    version: String,
    overrides: Vec<(String, BuildScript)>,
    built: Vec<String>,
    report: Option<VerificationReport>,
    output: String,
}

impl VerificationWorld {
    fn workspace(&self) -> &TestWorkspace {
        self.workspace.as_ref().expect("workspace set")
    }

    fn descriptor(&self, package: &str) -> &PackageDescriptor {
        self.packages
            .iter()
            .find(|d| d.name.as_str() == package)
            .unwrap_or_else(|| panic!("unknown package {package}"))
    }

    fn report(&self) -> &VerificationReport {
        self.report.as_ref().expect("verifier has run")
    }
}

#[fixture]
fn world() -> VerificationWorld {
    VerificationWorld::default()
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a workspace of six packages at version \"{version}\"")]
fn given_six_package_workspace(world: &mut VerificationWorld, version: String) {
    let workspace = TestWorkspace::new();
    let packages = six_packages();
    workspace.write_manifests(&packages, &version);
    world.workspace = Some(workspace);
    world.packages = packages;
    world.version = version;
}

#[given("package \"{package}\" declares version \"{version}\"")]
fn given_package_version(world: &mut VerificationWorld, package: String, version: String) {
    let manifest = world.descriptor(&package).manifest.clone();
    world
        .workspace()
        .write_manifest(&manifest, &package, &version);
}

#[given("the build of \"{package}\" fails with \"{stderr}\"")]
fn given_build_fails(world: &mut VerificationWorld, package: String, stderr: String) {
    world.overrides.push((package, BuildScript::Fail(stderr)));
}

#[given("the build of \"{package}\" produces no wheel")]
fn given_build_without_wheel(world: &mut VerificationWorld, package: String) {
    world.overrides.push((package, BuildScript::NoWheel));
}

#[given("the wheel for \"{package}\" ships \"{path}\"")]
fn given_wheel_ships_file(world: &mut VerificationWorld, package: String, path: String) {
    let fixture = WheelFixture::compliant(&package, &world.version).file(&path, "");
    world.overrides.push((package, BuildScript::Wheel(fixture)));
}

#[given("the source tree contains \"{path}\"")]
fn given_source_file(world: &mut VerificationWorld, path: String) {
    world.workspace().write_file(Utf8Path::new(&path), "");
}

#[given("a leftover build directory \"{path}\"")]
fn given_leftover_directory(world: &mut VerificationWorld, path: String) {
    world.workspace().create_dir(Utf8Path::new(&path));
}

#[when("the verifier runs")]
fn when_verifier_runs(world: &mut VerificationWorld) {
    let tool = world
        .overrides
        .iter()
        .fold(
            ScriptedBuildTool::passing(&world.packages, &world.version),
            |tool, (package, script)| tool.with(package, script.clone()),
        );
    let config = VerifierConfig {
        packages: world.packages.clone(),
        ..VerifierConfig::default()
    };

    let mut out = Vec::new();
    let report = Verifier::new(world.workspace().root(), &config, &tool)
        .run(&mut out)
        .expect("verification run");

    world.built = tool.built_packages();
    world.output = String::from_utf8(out).expect("utf8 output");
    world.report = Some(report);
}

#[then("the run passes")]
fn then_run_passes(world: &mut VerificationWorld) {
    assert_eq!(world.report().status, RunStatus::Passed, "{}", world.output);
    assert_eq!(world.report().exit_code(), 0);
}

#[then("the run fails")]
fn then_run_fails(world: &mut VerificationWorld) {
    assert_eq!(world.report().status, RunStatus::Failed, "{}", world.output);
    assert_eq!(world.report().exit_code(), 1);
}

#[then("the run reports a version mismatch")]
fn then_run_reports_mismatch(world: &mut VerificationWorld) {
    assert_eq!(world.report().status, RunStatus::VersionMismatch);
    assert_eq!(world.report().exit_code(), 1);
}

#[then("no package is built")]
fn then_nothing_built(world: &mut VerificationWorld) {
    assert!(world.built.is_empty(), "built: {:?}", world.built);
}

#[then("every package is built")]
fn then_everything_built(world: &mut VerificationWorld) {
    assert_eq!(world.built.len(), world.packages.len());
}

#[then("the output contains \"{text}\"")]
fn then_output_contains(world: &mut VerificationWorld, text: String) {
    assert!(
        world.output.contains(&text),
        "expected {text:?} in output:\n{}",
        world.output
    );
}

#[then("\"{path}\" no longer exists")]
fn then_path_removed(world: &mut VerificationWorld, path: String) {
    assert!(!world.workspace().root().join(&path).exists());
}

#[then("\"{path}\" still exists")]
fn then_path_kept(world: &mut VerificationWorld, path: String) {
    assert!(world.workspace().root().join(&path).exists());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/verification.feature",
    name = "Consistent workspace passes every check"
)]
fn scenario_consistent_workspace_passes(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Version mismatch stops before any build"
)]
fn scenario_version_mismatch(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Build failure is reported and later packages still build"
)]
fn scenario_build_failure(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Missing wheel is reported"
)]
fn scenario_missing_wheel(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Namespace initializer inside a wheel is reported"
)]
fn scenario_wheel_namespace_init(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Namespace initializer in the source tree is reported"
)]
fn scenario_source_namespace_init(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Build leftovers are removed after success"
)]
fn scenario_cleanup_after_success(world: VerificationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/verification.feature",
    name = "Build leftovers are kept after failure"
)]
fn scenario_no_cleanup_after_failure(world: VerificationWorld) {
    let _ = world;
}
