//! 통합 테스트 — 실제 lockfile 픽스처를 사용한 전체 흐름 검증

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use airlock_core::error::CommandError;
use airlock_core::paths::RootedPath;
use airlock_core::runner::{CommandOutput, CommandRunner, CommandSpec};
use airlock_core::types::{Provenance, Request};
use airlock_yarn_classic::fetcher::mirror_dir;
use airlock_yarn_classic::lockfile::LockfileLoader;
use airlock_yarn_classic::{
    Prefetcher, YarnClassicError, YarnClassicPackage, YarnLockLoader, resolve_packages,
};

fn fixture_project() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("project")
}

/// install 호출을 기록하고 항상 성공하는 러너
struct MockRunner {
    calls: Mutex<Vec<CommandSpec>>,
}

impl MockRunner {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        Ok(CommandOutput {
            exit_code: Some(0),
            stdout: "success Saved lockfile.\n".to_owned(),
            stderr: String::new(),
        })
    }
}

#[test]
fn fixture_lockfile_loads_all_entries_in_order() {
    let loader = YarnLockLoader::default();
    let entries = loader.load(&fixture_project().join("yarn.lock")).unwrap();

    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "chai",
            "assertion-error",
            "repo-dep",
            "external-tarball",
            "local-archive",
            "workspace-alias",
        ]
    );
}

#[test]
fn fixture_resolves_every_provenance_kind() {
    let loader = YarnLockLoader::default();
    let entries = loader.load(&fixture_project().join("yarn.lock")).unwrap();

    let root = RootedPath::new(fixture_project());
    let packages = resolve_packages(&root, &entries).unwrap();

    let kinds: Vec<_> = packages.iter().map(|p| p.provenance()).collect();
    assert_eq!(
        kinds,
        vec![
            Provenance::Registry,
            Provenance::Registry,
            Provenance::Git,
            Provenance::Url,
            Provenance::File,
            Provenance::Link,
        ]
    );

    // File/Link의 상대 경로는 정규화되어 루트 내부를 가리킴
    assert!(matches!(
        &packages[4],
        YarnClassicPackage::File { relpath, .. }
            if relpath == Path::new("vendor/local-archive-0.2.0.tgz")
    ));
    assert!(matches!(
        &packages[5],
        YarnClassicPackage::Link { relpath, .. }
            if relpath == Path::new("packages/workspace-alias")
    ));

    // git URL은 ref 프래그먼트까지 원본 그대로 보존
    assert!(matches!(
        &packages[2],
        YarnClassicPackage::Git { url, .. }
            if url == "git+https://github.com/org/repo-dep.git#5fa146bc283e2b2d0e0ae70b0881901a1b7ceafc"
    ));
}

#[tokio::test]
async fn prefetch_fixture_project_end_to_end() {
    let output = tempfile::tempdir().unwrap();
    let runner = MockRunner::new();

    let prefetcher = Prefetcher::builder().runner(runner.clone()).build().unwrap();
    let manifest = prefetcher
        .prefetch(&Request {
            project_root: fixture_project(),
            package_dirs: vec![".".to_owned()],
            output_dir: output.path().to_path_buf(),
        })
        .await
        .unwrap();

    assert_eq!(manifest.component_count(), 6);
    assert_eq!(manifest.components[0].name, "chai");
    assert!(
        manifest.components[0]
            .integrity
            .as_deref()
            .unwrap()
            .starts_with("sha512-")
    );
    assert!(manifest.project_files.is_empty());

    // install은 픽스처 디렉토리에서 고정 플래그로 한 번 실행됨
    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let spec = &calls[0];
    assert_eq!(spec.cwd, fixture_project());
    assert_eq!(spec.args[0], "install");
    assert!(spec.args.contains(&"--disable-pnp".to_owned()));
    assert!(spec.args.contains(&"--frozen-lockfile".to_owned()));
    assert!(spec.args.contains(&"--ignore-engines".to_owned()));
    assert!(spec.args.contains(&"--no-default-rc".to_owned()));
    assert!(spec.args.contains(&"--non-interactive".to_owned()));

    // install 환경은 출력 루트 아래의 미러를 절대 경로로 가리킴
    let mirror = mirror_dir(output.path());
    assert!(mirror.is_dir());
    assert!(
        spec.env
            .iter()
            .any(|(k, v)| k == "YARN_YARN_OFFLINE_MIRROR" && Path::new(v) == mirror)
    );
    assert!(
        spec.env
            .iter()
            .any(|(k, v)| k == "YARN_IGNORE_SCRIPTS" && v == "true")
    );

    // 매니페스트의 빌드 환경변수는 플레이스홀더를 사용
    let offline_mirror = manifest
        .environment_variables
        .iter()
        .find(|v| v.name == "YARN_YARN_OFFLINE_MIRROR")
        .unwrap();
    assert_eq!(offline_mirror.value, "${output_dir}/deps/yarn-classic");
    let pruning = manifest
        .environment_variables
        .iter()
        .find(|v| v.name == "YARN_YARN_OFFLINE_MIRROR_PRUNING")
        .unwrap();
    assert_eq!(pruning.value, "false");
}

#[tokio::test]
async fn prefetch_rejects_lockfile_with_escaping_local_path() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(
        project.path().join("yarn.lock"),
        "\"escape@file:../outside/escape-1.0.0.tgz\":\n  version \"1.0.0\"\n  resolved \"../outside/escape-1.0.0.tgz#abc\"\n",
    )
    .unwrap();
    let output = tempfile::tempdir().unwrap();
    let runner = MockRunner::new();

    let prefetcher = Prefetcher::builder().runner(runner.clone()).build().unwrap();
    let err = prefetcher
        .prefetch(&Request {
            project_root: project.path().to_path_buf(),
            package_dirs: vec![".".to_owned()],
            output_dir: output.path().to_path_buf(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, YarnClassicError::PathOutsideRoot(_)));
    // 해석 실패 시 install은 실행되지 않음
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn prefetch_rejects_lockfile_with_absolute_local_path() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(
        project.path().join("yarn.lock"),
        "\"abs@file:/root/some/path\":\n  version \"1.0.0\"\n  resolved \"/root/some/path#abc\"\n",
    )
    .unwrap();
    let output = tempfile::tempdir().unwrap();

    let prefetcher = Prefetcher::builder().runner(MockRunner::new()).build().unwrap();
    let err = prefetcher
        .prefetch(&Request {
            project_root: project.path().to_path_buf(),
            package_dirs: vec![".".to_owned()],
            output_dir: output.path().to_path_buf(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, YarnClassicError::RejectedPackage { .. }));
    assert!(err.to_string().contains("abs@1.0.0"));
    assert!(err.to_string().contains("/root/some/path"));
}
