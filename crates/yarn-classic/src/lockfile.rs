//! yarn.lock v1 로더
//!
//! [`LockfileLoader`]는 lockfile 문법을 해석하는 좁은 seam입니다.
//! 해석기는 이 trait이 내놓는 [`RawLockEntry`] 형태에만 의존하며,
//! lockfile 문법 자체는 알지 못합니다.
//!
//! [`YarnLockLoader`]는 yarn.lock v1 문법의 기본 구현입니다.
//! 항목 순서는 파일에 등장한 순서 그대로 유지됩니다.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::YarnClassicError;

/// lockfile에서 읽어낸 원시 항목
///
/// 파싱 이후에는 변경되지 않는 값 객체입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLockEntry {
    /// 패키지 이름 (비어 있지 않음)
    pub name: String,
    /// 잠긴 버전
    pub version: String,
    /// resolved URL (있는 경우)
    pub url: Option<String>,
    /// 로컬 경로 (file:/link: 지정자에서 추출, 있는 경우)
    pub path: Option<String>,
    /// 무결성 해시 (있는 경우)
    pub integrity: Option<String>,
    /// 개발 의존성 여부
    pub dev: bool,
}

/// lockfile 로더 seam
///
/// 해석기에 주입되는 협력자로, 파일 경로를 받아 원시 항목의 순서 있는
/// 목록을 내놓습니다.
pub trait LockfileLoader: Send + Sync {
    /// lockfile을 읽어 원시 항목 목록을 반환합니다.
    fn load(&self, path: &Path) -> Result<Vec<RawLockEntry>, YarnClassicError>;
}

/// yarn.lock v1 문법 로더
#[derive(Debug, Clone)]
pub struct YarnLockLoader {
    max_size: usize,
}

impl YarnLockLoader {
    /// 크기 상한을 지정하여 로더를 생성합니다.
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    /// lockfile 본문을 파싱합니다. `source`는 에러 메시지에만 쓰입니다.
    pub fn parse(content: &str, source: &str) -> Result<Vec<RawLockEntry>, YarnClassicError> {
        let mut entries = Vec::new();
        let mut current: Option<PartialEntry> = None;

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            // 들여쓰기 없는 줄은 새 항목의 헤더
            if !trimmed.starts_with(' ') {
                if let Some(entry) = current.take() {
                    entries.push(entry.finish(source)?);
                }
                current = Some(PartialEntry::from_header(trimmed, source, line_no + 1)?);
                continue;
            }

            // 2칸 들여쓰기 필드. 더 깊은 들여쓰기(dependencies: 하위 항목)는 무시.
            let Some(field) = trimmed.strip_prefix("  ") else {
                continue;
            };
            if field.starts_with(' ') || field.ends_with(':') {
                continue;
            }

            if let Some(entry) = current.as_mut() {
                entry.apply_field(field);
            }
        }

        if let Some(entry) = current.take() {
            entries.push(entry.finish(source)?);
        }

        debug!(source, count = entries.len(), "lockfile parsed");
        Ok(entries)
    }
}

impl Default for YarnLockLoader {
    fn default() -> Self {
        Self::new(10 * 1024 * 1024)
    }
}

impl LockfileLoader for YarnLockLoader {
    fn load(&self, path: &Path) -> Result<Vec<RawLockEntry>, YarnClassicError> {
        let display = path.display().to_string();

        let metadata = std::fs::metadata(path).map_err(|source| YarnClassicError::Io {
            path: display.clone(),
            source,
        })?;
        if metadata.len() > self.max_size as u64 {
            return Err(YarnClassicError::Lockfile {
                path: display,
                reason: format!(
                    "file size {} exceeds limit {}",
                    metadata.len(),
                    self.max_size
                ),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| YarnClassicError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&content, &display)
    }
}

/// 헤더는 읽었지만 필드는 아직 채워지는 중인 항목
struct PartialEntry {
    name: String,
    path: Option<String>,
    version: Option<String>,
    url: Option<String>,
    integrity: Option<String>,
}

impl PartialEntry {
    /// `"name@spec", "name@spec2":` 형태의 헤더 줄을 해석합니다.
    fn from_header(line: &str, source: &str, line_no: usize) -> Result<Self, YarnClassicError> {
        let Some(body) = line.strip_suffix(':') else {
            return Err(YarnClassicError::Lockfile {
                path: source.to_owned(),
                reason: format!("line {line_no}: entry header does not end with ':'"),
            });
        };

        // 첫 번째 지정자만 이름/로컬 경로 판별에 쓰입니다.
        // 동일 항목의 다른 지정자는 같은 패키지를 가리킵니다.
        let first = body
            .split(", ")
            .next()
            .map(|s| s.trim_matches('"'))
            .unwrap_or_default();

        // 이름은 선행 `@scope/`를 건너뛴 첫 번째 `@`까지입니다. 지정자 URL
        // 내부의 `@`(git+ssh://git@... 의 사용자 정보)는 이름이 아닙니다.
        let skip = usize::from(first.starts_with('@'));
        let Some(at) = first[skip..].find('@').map(|i| i + skip).filter(|&i| i > 0) else {
            return Err(YarnClassicError::Lockfile {
                path: source.to_owned(),
                reason: format!("line {line_no}: specifier '{first}' has no version part"),
            });
        };
        let name = first[..at].to_owned();
        let spec = &first[at + 1..];

        let path = spec
            .strip_prefix("file:")
            .or_else(|| spec.strip_prefix("link:"))
            .map(|p| p.strip_prefix("./").unwrap_or(p).to_owned());

        Ok(Self {
            name,
            path,
            version: None,
            url: None,
            integrity: None,
        })
    }

    /// `version "x"` 형태의 2칸 들여쓰기 필드를 반영합니다.
    fn apply_field(&mut self, field: &str) {
        let Some((key, value)) = field.split_once(' ') else {
            return;
        };
        let value = value.trim().trim_matches('"').to_owned();
        match key {
            "version" => self.version = Some(value),
            "resolved" => self.url = Some(value),
            "integrity" => self.integrity = Some(value),
            _ => {}
        }
    }

    fn finish(self, source: &str) -> Result<RawLockEntry, YarnClassicError> {
        let Some(version) = self.version else {
            return Err(YarnClassicError::Lockfile {
                path: source.to_owned(),
                reason: format!("entry '{}' has no version field", self.name),
            });
        };
        Ok(RawLockEntry {
            name: self.name,
            version,
            url: self.url,
            path: self.path,
            integrity: self.integrity,
            dev: false,
        })
    }
}
