//! 루트 고정 경로 — 프로젝트 루트를 벗어나지 않는 경로 결합
//!
//! [`RootedPath`]는 프로젝트 루트와 그 내부 경로의 쌍입니다.
//! [`RootedPath::join_within_root`]는 상대 경로를 어휘적으로 정규화하며 결합하고,
//! 결과가 루트 경계를 벗어나면 [`PathError::OutsideRoot`]로 즉시 실패합니다.
//! `..` 세그먼트를 통한 디렉토리 탈출을 막는 것이 목적이며, I/O는 수행하지 않습니다.
//!
//! # 사용 예시
//!
//! ```
//! use airlock_core::paths::RootedPath;
//!
//! let root = RootedPath::new("/project");
//! let inner = root.join_within_root("vendor/pkg").unwrap();
//! assert_eq!(inner.subpath_from_root().to_str(), Some("vendor/pkg"));
//!
//! assert!(root.join_within_root("../outside").is_err());
//! assert!(root.join_within_root("/absolute").is_err());
//! ```

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;

/// 루트에 고정된 경로
///
/// `path`는 항상 `root` 내부를 가리킨다는 것이 타입 불변식입니다.
/// 생성 직후에는 `path == root`이며, 내부 경로는
/// [`join_within_root`](Self::join_within_root)로만 만들 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootedPath {
    root: PathBuf,
    path: PathBuf,
}

impl RootedPath {
    /// 주어진 루트를 가리키는 `RootedPath`를 생성합니다.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            path: root.clone(),
            root,
        }
    }

    /// 루트 경로를 반환합니다.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 현재 가리키는 경로(루트 포함 전체 경로)를 반환합니다.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 루트 기준 상대 경로를 반환합니다.
    ///
    /// 루트 자신을 가리키면 빈 경로를 반환합니다.
    pub fn subpath_from_root(&self) -> &Path {
        // 불변식: path는 항상 root로 시작
        self.path.strip_prefix(&self.root).unwrap_or(&self.path)
    }

    /// 상대 경로를 루트 내부로 결합합니다.
    ///
    /// `.`/`..` 컴포넌트는 어휘적으로 정규화됩니다. 절대 경로, 루트 위로
    /// 올라가는 `..`, 결과가 루트 바깥이 되는 모든 입력은
    /// [`PathError::OutsideRoot`]를 반환합니다.
    pub fn join_within_root(&self, rel: impl AsRef<Path>) -> Result<RootedPath, PathError> {
        let rel = rel.as_ref();
        let outside = || PathError::OutsideRoot {
            path: rel.display().to_string(),
            root: self.root.display().to_string(),
        };

        let mut joined = self.path.clone();
        for component in rel.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(segment) => joined.push(segment),
                Component::ParentDir => {
                    // 루트 자체에서 한 단계 더 올라가면 경계 탈출
                    if joined == self.root || !joined.pop() {
                        return Err(outside());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }

        if !joined.starts_with(&self.root) {
            return Err(outside());
        }

        Ok(RootedPath {
            root: self.root.clone(),
            path: joined,
        })
    }
}

impl fmt::Display for RootedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
