//! 패키지 해석기 — 원시 lockfile 항목을 출처 레코드로 분류
//!
//! [`classify`]는 항목 하나를 다섯 가지 출처 중 정확히 하나로 분류하고,
//! [`resolve_packages`]는 항목 목록 전체를 순서대로 해석합니다.
//! 해석은 fail-fast입니다 — 첫 번째 잘못된 항목에서 전체가 중단되며,
//! 부분 결과는 반환되지 않습니다.
//!
//! # 분류 우선순위
//!
//! 1. 로컬 경로 + 경로형 URL → [`YarnClassicPackage::File`]
//! 2. 로컬 경로 + URL 없음 → [`YarnClassicPackage::Link`]
//! 3. URL 보유 → 레지스트리 → 버전 관리 → tarball 순으로 판별
//! 4. 어느 것도 아님 → `UnexpectedFormat` 에러
//!
//! File/Link의 상대 경로는 생성 시점에 프로젝트 루트 내부임이 검증됩니다.
//! 절대 경로이거나 루트를 벗어나는 항목은 레코드가 되기 전에 거부됩니다.

use std::path::{Path, PathBuf};

use airlock_core::paths::RootedPath;
use airlock_core::types::{Component, Provenance};
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

use crate::classifier::{is_from_trusted_registry, is_tarball_url, is_version_control_url};
use crate::error::YarnClassicError;
use crate::lockfile::RawLockEntry;

/// 출처가 확정된 잠긴 패키지
///
/// 변형 집합은 닫혀 있고 상호 배타적입니다. "unknown" 변형은 없으며,
/// 분류 불가능한 항목은 레코드가 되기 전에 에러로 거부됩니다.
/// 생성 이후 변경되지 않는 값 객체입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum YarnClassicPackage {
    /// 신뢰된 레지스트리에서 내려받는 패키지
    Registry {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 개발 의존성 여부
        dev: bool,
        /// 무결성 해시 (알려진 경우)
        integrity: Option<String>,
    },
    /// 버전 관리 원격 저장소 패키지 (ref 프래그먼트 포함 가능)
    Git {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 개발 의존성 여부
        dev: bool,
        /// 저장소 URL (원본 문자열 그대로)
        url: String,
    },
    /// 임의의 원격 아카이브 URL 패키지
    Url {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 개발 의존성 여부
        dev: bool,
        /// 아카이브 URL
        url: String,
    },
    /// 프로젝트 루트 내부의 로컬 아카이브 파일
    File {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 개발 의존성 여부
        dev: bool,
        /// 루트 기준 상대 경로 (루트 내부임이 보장됨)
        relpath: PathBuf,
    },
    /// 프로젝트 루트 내부의 워크스페이스 링크 — 가져올 내용 없음
    Link {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
        /// 개발 의존성 여부
        dev: bool,
        /// 루트 기준 상대 경로 (루트 내부임이 보장됨)
        relpath: PathBuf,
    },
}

impl YarnClassicPackage {
    /// 패키지 이름을 반환합니다.
    pub fn name(&self) -> &str {
        match self {
            Self::Registry { name, .. }
            | Self::Git { name, .. }
            | Self::Url { name, .. }
            | Self::File { name, .. }
            | Self::Link { name, .. } => name,
        }
    }

    /// 패키지 버전을 반환합니다.
    pub fn version(&self) -> &str {
        match self {
            Self::Registry { version, .. }
            | Self::Git { version, .. }
            | Self::Url { version, .. }
            | Self::File { version, .. }
            | Self::Link { version, .. } => version,
        }
    }

    /// 개발 의존성 여부를 반환합니다.
    pub fn dev(&self) -> bool {
        match self {
            Self::Registry { dev, .. }
            | Self::Git { dev, .. }
            | Self::Url { dev, .. }
            | Self::File { dev, .. }
            | Self::Link { dev, .. } => *dev,
        }
    }

    /// 출처 분류를 반환합니다.
    pub fn provenance(&self) -> Provenance {
        match self {
            Self::Registry { .. } => Provenance::Registry,
            Self::Git { .. } => Provenance::Git,
            Self::Url { .. } => Provenance::Url,
            Self::File { .. } => Provenance::File,
            Self::Link { .. } => Provenance::Link,
        }
    }

    /// 매니페스트 컴포넌트로 변환합니다.
    pub fn to_component(&self) -> Component {
        let integrity = match self {
            Self::Registry { integrity, .. } => integrity.clone(),
            _ => None,
        };
        Component {
            name: self.name().to_owned(),
            version: self.version().to_owned(),
            provenance: self.provenance(),
            integrity,
        }
    }
}

/// 원시 항목 하나를 출처 레코드로 분류합니다.
///
/// `project_root`는 File/Link 경로 검증의 경계입니다.
pub fn classify(
    project_root: &RootedPath,
    entry: &RawLockEntry,
) -> Result<YarnClassicPackage, YarnClassicError> {
    let name = entry.name.clone();
    let version = entry.version.clone();
    let dev = entry.dev;

    match (entry.path.as_deref(), entry.url.as_deref()) {
        // 경로형 URL(로컬 상대 참조)을 가진 로컬 아카이브
        (Some(path), Some(url)) if is_path_style_url(url) => {
            let relpath = validate_local_path(project_root, &name, &version, path)?;
            Ok(YarnClassicPackage::File {
                name,
                version,
                dev,
                relpath,
            })
        }
        // URL 없는 로컬 경로는 워크스페이스 링크
        (Some(path), None) => {
            let relpath = validate_local_path(project_root, &name, &version, path)?;
            Ok(YarnClassicPackage::Link {
                name,
                version,
                dev,
                relpath,
            })
        }
        (_, Some(url)) => {
            if is_from_trusted_registry(url) {
                Ok(YarnClassicPackage::Registry {
                    name,
                    version,
                    dev,
                    integrity: entry.integrity.clone(),
                })
            } else if is_version_control_url(url) {
                Ok(YarnClassicPackage::Git {
                    name,
                    version,
                    dev,
                    url: url.to_owned(),
                })
            } else if is_tarball_url(url) {
                Ok(YarnClassicPackage::Url {
                    name,
                    version,
                    dev,
                    url: url.to_owned(),
                })
            } else {
                Err(YarnClassicError::UnexpectedFormat {
                    name,
                    version,
                    value: url.to_owned(),
                })
            }
        }
        (None, None) => Err(YarnClassicError::UnexpectedFormat {
            name,
            version,
            value: "entry has neither a resolved url nor a local path".to_owned(),
        }),
    }
}

/// 항목 목록 전체를 순서대로 해석합니다. 첫 에러에서 즉시 중단합니다.
pub fn resolve_packages(
    project_root: &RootedPath,
    entries: &[RawLockEntry],
) -> Result<Vec<YarnClassicPackage>, YarnClassicError> {
    let mut packages = Vec::with_capacity(entries.len());
    for entry in entries {
        let package = classify(project_root, entry)?;
        trace!(
            name = package.name(),
            version = package.version(),
            provenance = %package.provenance(),
            "package classified"
        );
        packages.push(package);
    }
    Ok(packages)
}

/// 로컬 상대 참조로 해석되는 경로형 URL인지 판별합니다.
///
/// `./`/`../`로 시작하거나 기준 없는 상대 참조로만 파싱되는 경우에 한합니다.
/// 그 밖의 파싱 실패(깨진 절대 URL 등)는 경로가 아니라 형식 오류입니다.
fn is_path_style_url(url: &str) -> bool {
    url.starts_with("./")
        || url.starts_with("../")
        || matches!(
            Url::parse(url),
            Err(url::ParseError::RelativeUrlWithoutBase)
        )
}

/// File/Link 경로를 검증하고 루트 기준 상대 경로로 정규화합니다.
///
/// 절대 경로는 거부하고, 루트를 벗어나는 경로는 결합 단계에서 거부됩니다.
fn validate_local_path(
    project_root: &RootedPath,
    name: &str,
    version: &str,
    raw: &str,
) -> Result<PathBuf, YarnClassicError> {
    if Path::new(raw).is_absolute() {
        return Err(YarnClassicError::RejectedPackage {
            name: name.to_owned(),
            version: version.to_owned(),
            path: raw.to_owned(),
        });
    }
    let joined = project_root.join_within_root(raw)?;
    Ok(joined.subpath_from_root().to_path_buf())
}
