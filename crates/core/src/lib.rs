#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod paths;
pub mod runner;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{AirlockError, CommandError, ConfigError, PathError, PrefetchError};

// 설정
pub use config::AirlockConfig;

// 경로
pub use paths::RootedPath;

// 명령 실행
pub use runner::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};

// 도메인 타입
pub use types::{Component, EnvironmentVariable, Provenance, Request, RequestOutput};
