//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `airlock_`
//! - 모듈명: `yarn_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)

use metrics::{describe_counter, describe_histogram};

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 출처 레이블 키 (registry, git, url, file, link)
pub const LABEL_PROVENANCE: &str = "provenance";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── yarn-classic prefetcher 메트릭 ───────────────────────────────

/// 해석된 패키지 수 (counter, label: provenance)
pub const YARN_PACKAGES_RESOLVED_TOTAL: &str = "airlock_yarn_packages_resolved_total";

/// 해석 실패 수 (counter)
pub const YARN_RESOLVE_FAILURES_TOTAL: &str = "airlock_yarn_resolve_failures_total";

/// fetch 시도 수 (counter, label: result)
pub const YARN_FETCHES_TOTAL: &str = "airlock_yarn_fetches_total";

/// fetch 소요 시간 (histogram, 초)
pub const YARN_FETCH_DURATION_SECONDS: &str = "airlock_yarn_fetch_duration_seconds";

/// 모든 메트릭의 설명을 recorder에 등록합니다.
///
/// recorder 설치 이후 한 번 호출하면 됩니다. recorder가 없으면 no-op입니다.
pub fn describe_metrics() {
    describe_counter!(
        YARN_PACKAGES_RESOLVED_TOTAL,
        "Locked packages resolved into provenance records"
    );
    describe_counter!(
        YARN_RESOLVE_FAILURES_TOTAL,
        "Lockfile resolutions aborted by an invalid entry"
    );
    describe_counter!(YARN_FETCHES_TOTAL, "Offline-mirror fetch invocations");
    describe_histogram!(
        YARN_FETCH_DURATION_SECONDS,
        "Wall-clock duration of the package manager install step"
    );
}
