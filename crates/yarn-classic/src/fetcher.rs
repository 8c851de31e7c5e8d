//! 미러 채우기 오케스트레이터
//!
//! [`fetch_dependencies`]는 오프라인 미러 디렉토리를 보장한 뒤
//! 스코프된 환경으로 패키지 매니저의 install 단계를 실행합니다.
//! 미러는 append-only입니다 — pruning은 항상 비활성화되어
//! 이전 실행이 채운 아카이브는 절대 삭제되지 않습니다.
//!
//! [`build_environment_variables`]는 다운스트림 빌드가 같은 미러를
//! 읽도록 내보내야 하는 환경변수를 생성합니다. 빌드는 prefetch와 다른
//! 파일시스템에서 실행되므로 출력 루트는 `${output_dir}` 플레이스홀더로
//! 참조합니다.

use std::path::{Path, PathBuf};

use airlock_core::error::CommandError;
use airlock_core::runner::{CommandRunner, CommandSpec};
use airlock_core::types::EnvironmentVariable;
use tracing::{debug, info};

use crate::error::YarnClassicError;

/// install 단계에 전달하는 고정 플래그
///
/// - `--disable-pnp`: 관례적인 디스크 레이아웃을 위해 PnP 해석 비활성화
/// - `--frozen-lockfile`: lockfile 불일치 시 갱신 대신 실패
/// - `--ignore-engines`: prefetch는 빌드하지 않으므로 엔진 호환성 무시
/// - `--no-default-rc`: 프로젝트의 암묵적 rc 파일 무시
/// - `--non-interactive`: 프롬프트 없이 실행
pub const INSTALL_ARGS: [&str; 6] = [
    "install",
    "--disable-pnp",
    "--frozen-lockfile",
    "--ignore-engines",
    "--no-default-rc",
    "--non-interactive",
];

/// 출력 루트 아래의 오프라인 미러 경로를 반환합니다.
pub fn mirror_dir(output_root: &Path) -> PathBuf {
    output_root.join("deps").join("yarn-classic")
}

/// install 단계에 적용할 스코프된 환경을 생성합니다.
///
/// 자격 증명/다운로드 프롬프트와 프로젝트 메타데이터 기반 버전 자동 감지를
/// 끄고, 읽기/쓰기를 전역 캐시 대신 오프라인 미러로 고정하며,
/// 라이프사이클 스크립트 실행과 암묵적 PATH/shim 해석을 차단합니다.
pub fn prefetch_environment(mirror: &Path) -> Vec<(String, String)> {
    vec![
        ("COREPACK_ENABLE_DOWNLOAD_PROMPT".to_owned(), "0".to_owned()),
        ("COREPACK_ENABLE_PROJECT_SPEC".to_owned(), "0".to_owned()),
        ("YARN_IGNORE_PATH".to_owned(), "true".to_owned()),
        ("YARN_IGNORE_SCRIPTS".to_owned(), "true".to_owned()),
        (
            "YARN_YARN_OFFLINE_MIRROR".to_owned(),
            mirror.display().to_string(),
        ),
        (
            "YARN_YARN_OFFLINE_MIRROR_PRUNING".to_owned(),
            "false".to_owned(),
        ),
    ]
}

/// 패키지 디렉토리에서 install 단계를 실행하여 미러를 채웁니다.
///
/// 미러 디렉토리 생성은 멱등합니다. install이 0이 아닌 코드로 종료하거나
/// 기동에 실패하면 명령과 캡처된 출력을 담은 `FetchFailure`를 반환합니다.
/// 재시도는 하지 않습니다 — 재시도 정책은 호출자의 몫입니다.
pub fn fetch_dependencies(
    runner: &dyn CommandRunner,
    yarn_command: &str,
    package_dir: &Path,
    output_root: &Path,
) -> Result<(), YarnClassicError> {
    let mirror = mirror_dir(output_root);
    std::fs::create_dir_all(&mirror).map_err(|source| YarnClassicError::Io {
        path: mirror.display().to_string(),
        source,
    })?;

    let mut spec = CommandSpec::new(yarn_command, package_dir);
    spec.args = INSTALL_ARGS.iter().map(|arg| (*arg).to_owned()).collect();
    spec.env = prefetch_environment(&mirror);

    debug!(command = %spec.command_line(), cwd = %package_dir.display(), "running install step");

    let output = spec_output(runner, &spec)?;
    if !output.success() {
        let exit = output
            .exit_code
            .map_or_else(|| "terminated by signal".to_owned(), |c| format!("exit code {c}"));
        return Err(YarnClassicError::FetchFailure {
            command: spec.command_line(),
            reason: format!("{exit}: {}{}", output.stdout, output.stderr),
        });
    }

    info!(mirror = %mirror.display(), "offline mirror populated");
    Ok(())
}

fn spec_output(
    runner: &dyn CommandRunner,
    spec: &CommandSpec,
) -> Result<airlock_core::runner::CommandOutput, YarnClassicError> {
    runner.run(spec).map_err(|err| match err {
        CommandError::Spawn { command, reason } => YarnClassicError::FetchFailure {
            command,
            reason: format!("failed to launch: {reason}"),
        },
    })
}

/// 다운스트림 빌드가 내보내야 하는 환경변수를 생성합니다.
///
/// 값은 절대 경로 대신 `${output_dir}` 플레이스홀더로 미러를 참조하며,
/// 치환은 빌드 시점에 호출자가 수행합니다.
pub fn build_environment_variables() -> Vec<EnvironmentVariable> {
    vec![
        EnvironmentVariable::new(
            "YARN_YARN_OFFLINE_MIRROR",
            "${output_dir}/deps/yarn-classic",
        ),
        EnvironmentVariable::new("YARN_YARN_OFFLINE_MIRROR_PRUNING", "false"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use airlock_core::runner::CommandOutput;

    /// 호출을 기록하고 준비된 출력을 돌려주는 러너
    struct RecordingRunner {
        calls: Mutex<Vec<CommandSpec>>,
        result: fn() -> Result<CommandOutput, CommandError>,
    }

    impl RecordingRunner {
        fn succeeding() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                result: || {
                    Ok(CommandOutput {
                        exit_code: Some(0),
                        stdout: String::new(),
                        stderr: String::new(),
                    })
                },
            }
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
            self.calls.lock().unwrap().push(spec.clone());
            (self.result)()
        }
    }

    fn env_value<'a>(spec: &'a CommandSpec, name: &str) -> Option<&'a str> {
        spec.env
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn mirror_dir_is_under_output_root() {
        assert_eq!(
            mirror_dir(Path::new("/out")),
            PathBuf::from("/out/deps/yarn-classic")
        );
    }

    #[test]
    fn fetch_runs_install_with_expected_flags_env_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::succeeding();

        fetch_dependencies(&runner, "yarn", Path::new("/project/pkg"), dir.path()).unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let spec = &calls[0];
        assert_eq!(spec.program, "yarn");
        assert_eq!(spec.args, INSTALL_ARGS.map(str::to_owned));
        assert_eq!(spec.cwd, Path::new("/project/pkg"));

        let mirror = mirror_dir(dir.path());
        assert_eq!(
            env_value(spec, "YARN_YARN_OFFLINE_MIRROR"),
            Some(mirror.display().to_string().as_str())
        );
        assert_eq!(
            env_value(spec, "YARN_YARN_OFFLINE_MIRROR_PRUNING"),
            Some("false")
        );
        assert_eq!(env_value(spec, "YARN_IGNORE_SCRIPTS"), Some("true"));
        assert_eq!(env_value(spec, "YARN_IGNORE_PATH"), Some("true"));
        assert_eq!(env_value(spec, "COREPACK_ENABLE_DOWNLOAD_PROMPT"), Some("0"));
        assert_eq!(env_value(spec, "COREPACK_ENABLE_PROJECT_SPEC"), Some("0"));
    }

    #[test]
    fn fetch_creates_mirror_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::succeeding();

        fetch_dependencies(&runner, "yarn", Path::new("/project"), dir.path()).unwrap();

        assert!(mirror_dir(dir.path()).is_dir());
    }

    #[test]
    fn fetch_is_idempotent_against_populated_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = mirror_dir(dir.path());
        std::fs::create_dir_all(&mirror).unwrap();
        std::fs::write(mirror.join("previous-1.0.0.tgz"), b"archive").unwrap();

        let runner = RecordingRunner::succeeding();
        fetch_dependencies(&runner, "yarn", Path::new("/project"), dir.path()).unwrap();
        fetch_dependencies(&runner, "yarn", Path::new("/project"), dir.path()).unwrap();

        // 이전 실행의 아카이브는 그대로 남는다
        assert!(mirror.join("previous-1.0.0.tgz").exists());
        assert_eq!(runner.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn nonzero_exit_is_fetch_failure_with_captured_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner {
            calls: Mutex::new(Vec::new()),
            result: || {
                Ok(CommandOutput {
                    exit_code: Some(1),
                    stdout: String::new(),
                    stderr: "error Your lockfile needs to be updated.\n".to_owned(),
                })
            },
        };

        let err =
            fetch_dependencies(&runner, "yarn", Path::new("/project"), dir.path()).unwrap_err();
        assert!(matches!(err, YarnClassicError::FetchFailure { .. }));
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("lockfile needs to be updated"));
    }

    #[test]
    fn launch_failure_is_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner {
            calls: Mutex::new(Vec::new()),
            result: || {
                Err(CommandError::Spawn {
                    command: "yarn install".to_owned(),
                    reason: "No such file or directory".to_owned(),
                })
            },
        };

        let err =
            fetch_dependencies(&runner, "yarn", Path::new("/project"), dir.path()).unwrap_err();
        assert!(matches!(err, YarnClassicError::FetchFailure { .. }));
        assert!(err.to_string().contains("failed to launch"));
    }

    #[test]
    fn build_environment_uses_output_dir_placeholder() {
        let vars = build_environment_variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "YARN_YARN_OFFLINE_MIRROR");
        assert_eq!(vars[0].value, "${output_dir}/deps/yarn-classic");
        assert_eq!(vars[1].name, "YARN_YARN_OFFLINE_MIRROR_PRUNING");
        assert_eq!(vars[1].value, "false");
    }
}
