//! 도메인 타입 — 요청과 출력 매니페스트의 공통 값 객체
//!
//! prefetch 요청([`Request`])과 그 결과 매니페스트([`RequestOutput`])를
//! 구성하는 타입을 정의합니다. 모든 타입은 생성 후 변경되지 않는
//! 값 객체로 취급됩니다.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 잠긴 의존성의 출처 분류
///
/// lockfile의 각 항목은 다섯 가지 출처 중 정확히 하나로 분류됩니다.
/// "unknown" 변형은 존재하지 않습니다 — 분류가 불가능한 항목은
/// 레코드가 되기 전에 에러로 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// 신뢰된 패키지 레지스트리에서 내려받음
    Registry,
    /// 버전 관리 원격 저장소 (URL + ref)
    Git,
    /// 임의의 원격 아카이브 URL
    Url,
    /// 프로젝트 루트 내부의 로컬 아카이브 파일
    File,
    /// 프로젝트 루트 내부의 워크스페이스 링크 (가져올 내용 없음)
    Link,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => write!(f, "registry"),
            Self::Git => write!(f, "git"),
            Self::Url => write!(f, "url"),
            Self::File => write!(f, "file"),
            Self::Link => write!(f, "link"),
        }
    }
}

/// prefetch 요청
///
/// 프로젝트 루트, 루트 기준 패키지 디렉토리 목록, 출력 루트로 구성됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// 프로젝트 루트 경로
    pub project_root: PathBuf,
    /// 루트 기준 패키지 디렉토리 목록 (예: `"."`, `"packages/app"`)
    pub package_dirs: Vec<String>,
    /// 출력 루트 경로 (오프라인 미러가 이 아래에 생성됨)
    pub output_dir: PathBuf,
}

/// 매니페스트 컴포넌트
///
/// 해석된 패키지 하나에 대응하며, 이름/버전/출처/무결성 해시를 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: String,
    /// 출처 분류
    pub provenance: Provenance,
    /// 무결성 해시 (알려진 경우)
    pub integrity: Option<String>,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.provenance)
    }
}

/// 빌드 시점 환경변수
///
/// 값은 출력 루트를 `${output_dir}` 플레이스홀더로 참조할 수 있으며,
/// 치환은 빌드를 수행하는 호출자의 몫입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    /// 변수 이름
    pub name: String,
    /// 변수 값 (플레이스홀더 포함 가능)
    pub value: String,
}

impl EnvironmentVariable {
    /// 이름/값 쌍으로 환경변수를 생성합니다.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvironmentVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// prefetch 결과 매니페스트
///
/// 요청 전체가 성공했을 때에만 생성됩니다. 부분 성공 매니페스트는 없습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOutput {
    /// 컴포넌트 목록 (lockfile 순서 유지)
    pub components: Vec<Component>,
    /// 다운스트림 빌드가 내보내야 하는 환경변수
    pub environment_variables: Vec<EnvironmentVariable>,
    /// 프로젝트 파일 재작성 목록 — 이 생태계에서는 항상 빈 목록
    pub project_files: Vec<PathBuf>,
}

impl RequestOutput {
    /// 컴포넌트와 환경변수로 매니페스트를 생성합니다.
    pub fn new(
        components: Vec<Component>,
        environment_variables: Vec<EnvironmentVariable>,
    ) -> Self {
        Self {
            components,
            environment_variables,
            project_files: Vec::new(),
        }
    }

    /// 컴포넌트 수를 반환합니다.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl fmt::Display for RequestOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RequestOutput({} components, {} env vars)",
            self.components.len(),
            self.environment_variables.len(),
        )
    }
}
