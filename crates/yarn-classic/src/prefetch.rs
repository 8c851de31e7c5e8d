//! 요청 단위 오케스트레이터
//!
//! [`Prefetcher`]는 요청에 선언된 패키지 디렉토리마다
//! lockfile 로딩 → 해석 → 미러 채우기를 순서대로 수행하고,
//! 전체가 성공했을 때에만 매니페스트를 반환합니다.
//!
//! lockfile 해석과 install 서브프로세스는 블로킹 작업이므로
//! `tokio::task::spawn_blocking`에서 실행됩니다. 디렉토리 간 처리는
//! 순차적입니다 — 한 디렉토리의 install이 끝나야 그 디렉토리의
//! 컴포넌트 목록이 확정됩니다.

use std::sync::Arc;
use std::time::Instant;

use airlock_core::metrics::{
    LABEL_PROVENANCE, LABEL_RESULT, YARN_FETCHES_TOTAL, YARN_FETCH_DURATION_SECONDS,
    YARN_PACKAGES_RESOLVED_TOTAL, YARN_RESOLVE_FAILURES_TOTAL,
};
use airlock_core::paths::RootedPath;
use airlock_core::runner::{CommandRunner, ProcessRunner};
use airlock_core::types::{Component, Request, RequestOutput};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::YarnClassicConfig;
use crate::error::YarnClassicError;
use crate::fetcher::{build_environment_variables, fetch_dependencies};
use crate::lockfile::{LockfileLoader, YarnLockLoader};
use crate::resolver::resolve_packages;

/// yarn-classic prefetch 오케스트레이터
///
/// [`PrefetcherBuilder`]로 생성합니다. 러너와 로더는 테스트에서
/// 대체할 수 있는 주입 협력자입니다.
pub struct Prefetcher {
    config: YarnClassicConfig,
    runner: Arc<dyn CommandRunner>,
    loader: Arc<dyn LockfileLoader>,
}

impl Prefetcher {
    /// 빌더를 반환합니다.
    pub fn builder() -> PrefetcherBuilder {
        PrefetcherBuilder::new()
    }

    /// 요청을 처리하고 매니페스트를 반환합니다.
    ///
    /// 패키지 디렉토리 하나라도 실패하면 전체가 실패합니다.
    /// 부분 성공 매니페스트는 없습니다.
    pub async fn prefetch(&self, request: &Request) -> Result<RequestOutput, YarnClassicError> {
        let prefetch_id = Uuid::new_v4();
        info!(
            %prefetch_id,
            project_root = %request.project_root.display(),
            package_dirs = request.package_dirs.len(),
            "prefetch started"
        );

        let project_root = RootedPath::new(&request.project_root);
        let mut components: Vec<Component> = Vec::new();

        for dir in &request.package_dirs {
            let package_dir = project_root.join_within_root(dir)?;
            let resolved = self
                .prefetch_package_dir(&project_root, &package_dir, request)
                .await;

            match resolved {
                Ok(mut dir_components) => components.append(&mut dir_components),
                Err(err) => {
                    warn!(%prefetch_id, package_dir = %package_dir, error = %err, "prefetch failed");
                    return Err(err);
                }
            }
        }

        info!(%prefetch_id, components = components.len(), "prefetch finished");
        Ok(RequestOutput::new(components, build_environment_variables()))
    }

    /// 패키지 디렉토리 하나를 처리합니다: 로딩 → 해석 → 미러 채우기.
    async fn prefetch_package_dir(
        &self,
        project_root: &RootedPath,
        package_dir: &RootedPath,
        request: &Request,
    ) -> Result<Vec<Component>, YarnClassicError> {
        let loader = Arc::clone(&self.loader);
        let runner = Arc::clone(&self.runner);
        let project_root = project_root.clone();
        let package_dir = package_dir.clone();
        let lockfile_name = self.config.lockfile_name.clone();
        let yarn_command = self.config.yarn_command.clone();
        let output_dir = request.output_dir.clone();

        tokio::task::spawn_blocking(move || {
            let lockfile_path = package_dir.path().join(&lockfile_name);
            let entries = loader.load(&lockfile_path)?;

            let packages = resolve_packages(&project_root, &entries).inspect_err(|_| {
                metrics::counter!(YARN_RESOLVE_FAILURES_TOTAL).increment(1);
            })?;
            for package in &packages {
                metrics::counter!(
                    YARN_PACKAGES_RESOLVED_TOTAL,
                    LABEL_PROVENANCE => package.provenance().to_string()
                )
                .increment(1);
            }

            let started = Instant::now();
            let fetched =
                fetch_dependencies(runner.as_ref(), &yarn_command, package_dir.path(), &output_dir);
            metrics::histogram!(YARN_FETCH_DURATION_SECONDS)
                .record(started.elapsed().as_secs_f64());
            metrics::counter!(
                YARN_FETCHES_TOTAL,
                LABEL_RESULT => if fetched.is_ok() { "success" } else { "failure" }
            )
            .increment(1);
            fetched?;

            Ok(packages.iter().map(|p| p.to_component()).collect())
        })
        .await
        .map_err(|err| YarnClassicError::Task(err.to_string()))?
    }
}

/// [`Prefetcher`] 빌더
pub struct PrefetcherBuilder {
    config: Option<YarnClassicConfig>,
    runner: Option<Arc<dyn CommandRunner>>,
    loader: Option<Arc<dyn LockfileLoader>>,
}

impl PrefetcherBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: None,
            runner: None,
            loader: None,
        }
    }

    /// 설정을 지정합니다.
    pub fn config(mut self, config: YarnClassicConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 명령 러너를 지정합니다. 기본값은 [`ProcessRunner`]입니다.
    pub fn runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// lockfile 로더를 지정합니다. 기본값은 [`YarnLockLoader`]입니다.
    pub fn loader(mut self, loader: Arc<dyn LockfileLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// 오케스트레이터를 조립하고 설정을 검증합니다.
    pub fn build(self) -> Result<Prefetcher, YarnClassicError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(YarnLockLoader::new(config.max_lockfile_size)));
        let runner = self.runner.unwrap_or_else(|| Arc::new(ProcessRunner::new()));

        Ok(Prefetcher {
            config,
            runner,
            loader,
        })
    }
}

impl Default for PrefetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
