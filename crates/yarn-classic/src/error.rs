//! yarn-classic prefetcher 에러 타입
//!
//! [`YarnClassicError`]는 이 크레이트에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<YarnClassicError> for AirlockError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **패키지 거부**: `RejectedPackage` (절대 경로), `PathOutsideRoot` (루트 탈출)
//! - **분류 불가**: `UnexpectedFormat`
//! - **미러 채우기**: `FetchFailure`
//! - **lockfile 로딩**: `Lockfile`, `Io`
//! - **설정**: `Config`
//! - **비동기 실행**: `Task`
//!
//! 모든 에러는 발생한 작업 전체를 중단시키는 종단 에러입니다.
//! 부분 성공 매니페스트나 내부 재시도는 없습니다.

use airlock_core::error::{AirlockError, ConfigError, PathError, PrefetchError};

/// yarn-classic 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum YarnClassicError {
    /// 구조적으로 허용되지 않는 패키지 (절대 로컬 경로)
    #[error("the package {name}@{version} has an absolute path ({path}), which is not permitted")]
    RejectedPackage {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 문제의 경로
        path: String,
    },

    /// 로컬 경로가 프로젝트 루트를 벗어남 — 보안 결함으로 즉시 실패
    #[error(transparent)]
    PathOutsideRoot(#[from] PathError),

    /// URL/스킴이 알려진 출처 패턴과 일치하지 않음
    #[error("unexpected format of package {name}@{version}: '{value}'")]
    UnexpectedFormat {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 문제의 URL 또는 항목 설명
        value: String,
    },

    /// 패키지 매니저 install 단계 실패 (0이 아닌 종료 코드 또는 기동 실패)
    #[error("failed to fetch dependencies: '{command}': {reason}")]
    FetchFailure {
        /// 실행한 명령 한 줄 표현
        command: String,
        /// 종료 코드와 캡처된 출력
        reason: String,
    },

    /// lockfile 파싱 실패
    #[error("lockfile parse error: {path}: {reason}")]
    Lockfile {
        /// 파싱 대상 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 백그라운드 태스크 실행 에러
    #[error("task error: {0}")]
    Task(String),
}

impl From<YarnClassicError> for AirlockError {
    fn from(err: YarnClassicError) -> Self {
        match err {
            YarnClassicError::RejectedPackage { .. }
            | YarnClassicError::PathOutsideRoot(_)
            | YarnClassicError::UnexpectedFormat { .. }
            | YarnClassicError::Lockfile { .. } => {
                AirlockError::Prefetch(PrefetchError::ResolveFailed(err.to_string()))
            }
            YarnClassicError::FetchFailure { .. } | YarnClassicError::Task(_) => {
                AirlockError::Prefetch(PrefetchError::FetchFailed(err.to_string()))
            }
            YarnClassicError::Config { field, reason } => {
                AirlockError::Config(ConfigError::InvalidValue { field, reason })
            }
            YarnClassicError::Io { source, .. } => AirlockError::Io(source),
        }
    }
}
