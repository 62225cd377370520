//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 엔진은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더(exporter) 설치는 호스트 애플리케이션의 몫입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `healthswap_`
//! - 영역명: `catalog_`, `alternatives_`, `comparisons_`, `quantity_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(healthswap_core::metrics::CATALOG_RETRIES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 카탈로그 종류 레이블 키 (food, pet_food)
pub const LABEL_CATALOG: &str = "catalog";

/// 빈 결과 사유 레이블 키 (no_qualifying_candidates, catalog_unavailable, no_search_terms)
pub const LABEL_REASON: &str = "reason";

/// 비교 판정 레이블 키 (a, b, tie, unknown)
pub const LABEL_WINNER: &str = "winner";

// ─── Catalog 메트릭 ────────────────────────────────────────────────

/// Catalog: 검색 요청 수 (counter, labels: catalog, result)
pub const CATALOG_REQUESTS_TOTAL: &str = "healthswap_catalog_requests_total";

/// Catalog: 재시도 수 (counter)
pub const CATALOG_RETRIES_TOTAL: &str = "healthswap_catalog_retries_total";

// ─── Alternatives 메트릭 ───────────────────────────────────────────

/// Alternatives: 반환된 대체품 수 (counter)
pub const ALTERNATIVES_FOUND_TOTAL: &str = "healthswap_alternatives_found_total";

/// Alternatives: 빈 결과로 끝난 요청 수 (counter, label: reason)
pub const ALTERNATIVES_EMPTY_TOTAL: &str = "healthswap_alternatives_empty_total";

// ─── Comparison / Quantity 메트릭 ──────────────────────────────────

/// Comparison: 수행된 비교 수 (counter, label: winner)
pub const COMPARISONS_TOTAL: &str = "healthswap_comparisons_total";

/// Quantity: 인식하지 못한 용량 문자열 수 (counter)
pub const QUANTITY_PARSE_FAILURES_TOTAL: &str = "healthswap_quantity_parse_failures_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        CATALOG_REQUESTS_TOTAL,
        "Total number of catalog search requests by catalog and result"
    );
    describe_counter!(
        CATALOG_RETRIES_TOTAL,
        "Total number of catalog search retries after a transient failure"
    );
    describe_counter!(
        ALTERNATIVES_FOUND_TOTAL,
        "Total number of healthier alternatives returned"
    );
    describe_counter!(
        ALTERNATIVES_EMPTY_TOTAL,
        "Total number of alternative searches that returned nothing, by reason"
    );
    describe_counter!(
        COMPARISONS_TOTAL,
        "Total number of head-to-head product comparisons by winner"
    );
    describe_counter!(
        QUANTITY_PARSE_FAILURES_TOTAL,
        "Total number of package size strings that could not be parsed"
    );
}
