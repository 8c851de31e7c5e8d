//! 에러 타입 — 도메인별 에러 정의

/// Airlock 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AirlockError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 경로 안전성 에러
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// 명령 실행 에러
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// 의존성 prefetch 에러
    #[error("prefetch error: {0}")]
    Prefetch(#[from] PrefetchError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 경로 안전성 에러
///
/// 프로젝트 루트를 벗어나는 경로 결합은 보안 결함으로 간주하여
/// 절대 조용히 보정하지 않고 즉시 실패합니다.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// 결합 결과가 루트 바깥을 가리킴
    #[error("path '{path}' is outside of root '{root}'")]
    OutsideRoot { path: String, root: String },
}

/// 명령 실행 에러
///
/// 서브프로세스 실행 자체의 실패만 나타냅니다. 0이 아닌 종료 코드는
/// [`CommandOutput`](crate::runner::CommandOutput)으로 반환되며,
/// 그 해석은 호출자(orchestrator)의 책임입니다.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// 프로세스 기동 실패 (바이너리 없음, 권한 등)
    #[error("failed to spawn '{command}': {reason}")]
    Spawn { command: String, reason: String },
}

/// 의존성 prefetch 에러
///
/// 도메인 크레이트(airlock-yarn-classic)의 상세 에러가
/// `From` 변환을 통해 이 타입으로 합류합니다.
#[derive(Debug, thiserror::Error)]
pub enum PrefetchError {
    /// lockfile 해석/분류 실패
    #[error("resolve failed: {0}")]
    ResolveFailed(String),

    /// 오프라인 미러 채우기 실패
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}
