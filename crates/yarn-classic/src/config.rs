//! yarn-classic prefetcher 설정
//!
//! [`YarnClassicConfig`]는 prefetcher 동작에 필요한 설정을 담습니다.
//! 상위 설정([`airlock_core::config::YarnConfig`])에서 변환하거나
//! 빌더로 직접 조립할 수 있습니다.

use airlock_core::config::YarnConfig;

use crate::error::YarnClassicError;

const MAX_LOCKFILE_SIZE_LIMIT: usize = 100 * 1024 * 1024; // 100 MB

/// yarn-classic prefetcher 설정
#[derive(Debug, Clone)]
pub struct YarnClassicConfig {
    /// 패키지 디렉토리 내 lockfile 파일명
    pub lockfile_name: String,
    /// lockfile 최대 허용 크기 (바이트)
    pub max_lockfile_size: usize,
    /// 패키지 매니저 실행 파일 이름
    pub yarn_command: String,
}

impl Default for YarnClassicConfig {
    fn default() -> Self {
        Self {
            lockfile_name: "yarn.lock".to_owned(),
            max_lockfile_size: 10 * 1024 * 1024, // 10 MB
            yarn_command: "yarn".to_owned(),
        }
    }
}

impl YarnClassicConfig {
    /// 상위 설정 섹션에서 prefetcher 설정을 만듭니다.
    pub fn from_core(config: &YarnConfig) -> Self {
        Self {
            lockfile_name: config.lockfile_name.clone(),
            max_lockfile_size: config.max_lockfile_size,
            yarn_command: config.yarn_command.clone(),
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), YarnClassicError> {
        if self.lockfile_name.is_empty()
            || self.lockfile_name.contains('/')
            || self.lockfile_name.contains('\\')
        {
            return Err(YarnClassicError::Config {
                field: "lockfile_name".to_owned(),
                reason: "must be a bare file name".to_owned(),
            });
        }
        if self.max_lockfile_size == 0 || self.max_lockfile_size > MAX_LOCKFILE_SIZE_LIMIT {
            return Err(YarnClassicError::Config {
                field: "max_lockfile_size".to_owned(),
                reason: format!("must be 1-{MAX_LOCKFILE_SIZE_LIMIT}"),
            });
        }
        if self.yarn_command.is_empty() {
            return Err(YarnClassicError::Config {
                field: "yarn_command".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// [`YarnClassicConfig`] 빌더
#[derive(Debug, Default)]
pub struct YarnClassicConfigBuilder {
    lockfile_name: Option<String>,
    max_lockfile_size: Option<usize>,
    yarn_command: Option<String>,
}

impl YarnClassicConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// lockfile 파일명을 설정합니다.
    pub fn lockfile_name(mut self, name: impl Into<String>) -> Self {
        self.lockfile_name = Some(name.into());
        self
    }

    /// lockfile 최대 크기를 설정합니다.
    pub fn max_lockfile_size(mut self, size: usize) -> Self {
        self.max_lockfile_size = Some(size);
        self
    }

    /// 패키지 매니저 실행 파일 이름을 설정합니다.
    pub fn yarn_command(mut self, command: impl Into<String>) -> Self {
        self.yarn_command = Some(command.into());
        self
    }

    /// 설정을 조립하고 검증합니다.
    pub fn build(self) -> Result<YarnClassicConfig, YarnClassicError> {
        let defaults = YarnClassicConfig::default();
        let config = YarnClassicConfig {
            lockfile_name: self.lockfile_name.unwrap_or(defaults.lockfile_name),
            max_lockfile_size: self.max_lockfile_size.unwrap_or(defaults.max_lockfile_size),
            yarn_command: self.yarn_command.unwrap_or(defaults.yarn_command),
        };
        config.validate()?;
        Ok(config)
    }
}
