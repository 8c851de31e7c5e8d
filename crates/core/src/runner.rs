//! 명령 실행 seam — 패키지 매니저 서브프로세스 추상화
//!
//! [`CommandRunner`] trait은 "인자 + 작업 디렉토리 + 환경변수"를 받아
//! 종료 코드와 캡처된 출력을 돌려주는 좁은 인터페이스입니다.
//! fetch orchestrator는 이 trait을 통해서만 프로세스를 실행하므로
//! 실제 yarn 바이너리 없이도 단위 테스트가 가능합니다.
//!
//! 프로덕션 구현은 [`ProcessRunner`]이며 `std::process::Command`를 사용합니다.
//! 비동기 문맥에서는 `tokio::task::spawn_blocking` 내부에서 호출합니다.

use std::path::PathBuf;
use std::process::Command;

use crate::error::CommandError;

/// 실행할 명령의 명세
///
/// `env`는 현재 프로세스 환경 위에 덧씌워지는 추가 환경변수입니다.
/// (`PATH`, `HOME` 등은 그대로 상속되어야 패키지 매니저가 동작합니다.)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// 실행 파일 이름 또는 경로
    pub program: String,
    /// 명령 인자 목록
    pub args: Vec<String>,
    /// 작업 디렉토리
    pub cwd: PathBuf,
    /// 추가 환경변수 (이름, 값)
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// 인자와 환경이 비어 있는 명세를 생성합니다.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    /// 에러 메시지용 한 줄 표현을 반환합니다.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// 서브프로세스 실행 결과
///
/// 0이 아닌 종료 코드도 여기에 담겨 돌아옵니다. 실행 자체가 실패한 경우에만
/// [`CommandError`]가 발생합니다.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// 종료 코드 (시그널로 종료되면 `None`)
    pub exit_code: Option<i32>,
    /// 캡처된 표준 출력
    pub stdout: String,
    /// 캡처된 표준 에러
    pub stderr: String,
}

impl CommandOutput {
    /// 종료 코드가 0인지 확인합니다.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// 명령 실행 trait
///
/// 구현체는 명세대로 프로세스를 실행하고 출력을 캡처합니다.
/// 재시도나 타임아웃 정책은 이 계층의 책임이 아닙니다.
pub trait CommandRunner: Send + Sync {
    /// 명령을 실행하고 완료까지 블로킹합니다.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// `std::process::Command` 기반 프로덕션 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// 새 러너를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| CommandError::Spawn {
                command: spec.command_line(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
