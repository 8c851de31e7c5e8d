//! 설정 관리 — airlock.toml 파싱 및 런타임 설정
//!
//! [`AirlockConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`AIRLOCK_YARN_COMMAND=yarn` 형식)
//! 3. 설정 파일 (`airlock.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), airlock_core::error::AirlockError> {
//! use airlock_core::config::AirlockConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AirlockConfig::load("airlock.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AirlockConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AirlockError, ConfigError};

/// Airlock 통합 설정
///
/// `airlock.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirlockConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// yarn-classic prefetcher 설정
    #[serde(default)]
    pub yarn: YarnConfig,
}

impl AirlockConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AirlockError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AirlockError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AirlockError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AirlockError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AirlockError> {
        toml::from_str(toml_str).map_err(|e| {
            AirlockError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `AIRLOCK_{SECTION}_{FIELD}`
    /// 예: `AIRLOCK_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "AIRLOCK_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "AIRLOCK_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.output_dir, "AIRLOCK_GENERAL_OUTPUT_DIR");

        // Yarn
        override_bool(&mut self.yarn.enabled, "AIRLOCK_YARN_ENABLED");
        override_csv(&mut self.yarn.package_dirs, "AIRLOCK_YARN_PACKAGE_DIRS");
        override_string(&mut self.yarn.lockfile_name, "AIRLOCK_YARN_LOCKFILE_NAME");
        override_usize(
            &mut self.yarn.max_lockfile_size,
            "AIRLOCK_YARN_MAX_LOCKFILE_SIZE",
        );
        override_string(&mut self.yarn.yarn_command, "AIRLOCK_YARN_COMMAND");
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AirlockError> {
        self.general.validate()?;
        self.yarn.validate()?;
        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 포맷 (text, json)
    pub log_format: String,
    /// 기본 출력 루트 (CLI 인자가 없을 때 사용)
    pub output_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "text".to_owned(),
            output_dir: "./airlock-output".to_owned(),
        }
    }
}

impl GeneralConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("'{}' is not one of {:?}", self.log_level, LEVELS),
            });
        }
        if self.log_format != "text" && self.log_format != "json" {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("'{}' is not 'text' or 'json'", self.log_format),
            });
        }
        if self.output_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.output_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// 설정 상한값 상수
const MAX_LOCKFILE_SIZE_LIMIT: usize = 100 * 1024 * 1024; // 100 MB
const MAX_PATH_LEN: usize = 4096;

/// yarn-classic prefetcher 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YarnConfig {
    /// prefetcher 활성화 여부
    pub enabled: bool,
    /// 프로젝트 루트 기준 패키지 디렉토리 목록
    pub package_dirs: Vec<String>,
    /// 패키지 디렉토리 내 lockfile 파일명
    pub lockfile_name: String,
    /// lockfile 최대 허용 크기 (바이트)
    pub max_lockfile_size: usize,
    /// 패키지 매니저 실행 파일 이름
    pub yarn_command: String,
}

impl Default for YarnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            package_dirs: vec![".".to_owned()],
            lockfile_name: "yarn.lock".to_owned(),
            max_lockfile_size: 10 * 1024 * 1024, // 10 MB
            yarn_command: "yarn".to_owned(),
        }
    }
}

impl YarnConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.lockfile_name.is_empty()
            || self.lockfile_name.contains('/')
            || self.lockfile_name.contains('\\')
        {
            return Err(ConfigError::InvalidValue {
                field: "yarn.lockfile_name".to_owned(),
                reason: "must be a bare file name".to_owned(),
            });
        }

        if self.max_lockfile_size == 0 || self.max_lockfile_size > MAX_LOCKFILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "yarn.max_lockfile_size".to_owned(),
                reason: format!("must be 1-{MAX_LOCKFILE_SIZE_LIMIT}"),
            });
        }

        if self.yarn_command.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "yarn.yarn_command".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.enabled && self.package_dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "yarn.package_dirs".to_owned(),
                reason: "at least one package directory required when enabled".to_owned(),
            });
        }

        // 경로 순회 방어: ".."와 절대 경로는 설정 단계에서 거부
        for dir in &self.package_dirs {
            if dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "yarn.package_dirs".to_owned(),
                    reason: "package directory path must not be empty".to_owned(),
                });
            }
            let path = std::path::Path::new(dir);
            if path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "yarn.package_dirs".to_owned(),
                    reason: format!("package directory '{dir}' must be relative"),
                });
            }
            if path
                .components()
                .any(|c| c == std::path::Component::ParentDir)
            {
                return Err(ConfigError::InvalidValue {
                    field: "yarn.package_dirs".to_owned(),
                    reason: format!("package directory '{dir}' contains path traversal pattern '..'"),
                });
            }
            if dir.len() > MAX_PATH_LEN {
                return Err(ConfigError::InvalidValue {
                    field: "yarn.package_dirs".to_owned(),
                    reason: format!("package directory path exceeds maximum length {MAX_PATH_LEN}"),
                });
            }
        }

        Ok(())
    }
}

// ─── 환경변수 오버라이드 헬퍼 ──────────────────────────────────────

fn override_string(target: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value;
    }
}

fn override_bool(target: &mut bool, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring unparsable boolean override"),
        }
    }
}

fn override_usize(target: &mut usize, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring unparsable integer override"),
        }
    }
}

fn override_csv(target: &mut Vec<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
}
