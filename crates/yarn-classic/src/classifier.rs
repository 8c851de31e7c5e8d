//! URL 분류 술어
//!
//! lockfile 항목의 resolved URL을 출처별로 판별하는 순수 함수들입니다.
//! 네트워크 접근과 I/O가 전혀 없으며, 해석기는 이 술어들을
//! 레지스트리 → 버전 관리 → 일반 아카이브의 고정 우선순위로 평가합니다.

use url::Url;

/// 신뢰된 공개 레지스트리 호스트명 (완전 일치)
const TRUSTED_REGISTRY_HOSTS: [&str; 2] = ["registry.npmjs.org", "registry.yarnpkg.com"];

/// 알려진 코드 호스팅 도메인 — `https://<host>/<org>/<repo>` 형태를 저장소로 간주
const KNOWN_GIT_HOSTS: [&str; 4] = ["github.com", "gitlab.com", "bitbucket.com", "bitbucket.org"];

/// URL이 원격 tarball 아카이브를 가리키는지 판별합니다.
///
/// `http`/`https` 스킴에서 경로가 `.tar.gz`/`.tgz`/`.tar`로 끝나거나,
/// 코드 아카이브 다운로드 엔드포인트처럼 `tar.gz/<revision>` 세그먼트를
/// 포함하면 true입니다. 그 외 스킴(`ftp` 포함)은 항상 false입니다.
pub fn is_tarball_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    let path = parsed.path();
    if path.ends_with(".tar.gz") || path.ends_with(".tgz") || path.ends_with(".tar") {
        return true;
    }

    // codeload 스타일: .../tar.gz/<revision>
    if let Some(segments) = parsed.path_segments() {
        let segments: Vec<_> = segments.collect();
        return segments
            .windows(2)
            .any(|pair| pair[0] == "tar.gz" && !pair[1].is_empty());
    }

    false
}

/// URL이 버전 관리 원격 저장소를 가리키는지 판별합니다.
///
/// tarball 분류가 항상 우선합니다 — 같은 문자열이 두 분류에 동시에
/// 해당하는 일은 없습니다.
pub fn is_version_control_url(url: &str) -> bool {
    if is_tarball_url(url) {
        return false;
    }
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    match parsed.scheme() {
        "git" | "ssh" | "git+http" | "git+https" | "git+ssh" | "git+file" => return true,
        "http" | "https" => {}
        _ => return false,
    }

    if parsed.path().ends_with(".git") {
        return true;
    }

    // https://github.com/org/repo 형태 — 정확히 두 개의 경로 세그먼트
    if parsed.scheme() == "https" {
        if let (Some(host), Some(segments)) = (parsed.host_str(), parsed.path_segments()) {
            if KNOWN_GIT_HOSTS.contains(&host) {
                let segments: Vec<_> = segments.filter(|s| !s.is_empty()).collect();
                return segments.len() == 2;
            }
        }
    }

    false
}

/// URL 호스트가 신뢰된 패키지 레지스트리인지 판별합니다.
pub fn is_from_trusted_registry(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed
        .host_str()
        .is_some_and(|host| TRUSTED_REGISTRY_HOSTS.contains(&host))
}
