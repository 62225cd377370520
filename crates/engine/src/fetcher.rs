//! 후보 수집기 -- 검색어별 카탈로그 조회, 타임아웃, 재시도, 병합
//!
//! [`CandidateFetcher`]는 검색어마다 독립된 태스크로 카탈로그를 조회하고,
//! 결과를 **검색어 제출 순서**대로 병합합니다 (검색어 내부는 응답 순서 유지).
//! 따라서 같은 카탈로그 응답에 대해 순위 결과가 항상 재현됩니다.
//!
//! 실패(타임아웃, 연결 오류, 2xx가 아닌 응답)는 재시도 후에도 남으면
//! 해당 검색어의 빈 목록으로 처리됩니다. 에러를 호출자에게 올리지 않습니다.
//!
//! 수집 중인 future가 drop되면 `JoinSet`이 진행 중인 요청 태스크를 모두 중단합니다.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use healthswap_core::metrics as m;
use healthswap_core::types::CatalogKind;

use crate::catalog::{CandidateProduct, CatalogClient};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// 요청 타임아웃과 재시도 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 요청 1회당 타임아웃
    pub request_timeout: Duration,
    /// 최초 시도 이후 재시도 횟수
    pub max_retries: u32,
    /// 지수 백오프 기본 간격 (`base × 2^(n-1)`)
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// 엔진 설정에서 정책을 만듭니다.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            request_timeout: config.request_timeout,
            max_retries: config.max_retries,
            backoff_base: config.retry_backoff_base(),
        }
    }

    /// `attempt`번째 재시도 전 대기 시간 (1부터 시작)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// 수집 결과
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// 제출 순서대로 병합된 후보
    pub candidates: Vec<CandidateProduct>,
    /// 성공한 검색어
    pub succeeded_terms: Vec<String>,
    /// 재시도 후에도 실패한 검색어
    pub failed_terms: Vec<String>,
}

impl FetchOutcome {
    /// 검색어가 있었지만 모두 실패했는지 확인합니다.
    pub fn all_failed(&self) -> bool {
        self.succeeded_terms.is_empty() && !self.failed_terms.is_empty()
    }
}

/// 후보 수집기
pub struct CandidateFetcher<C: CatalogClient> {
    client: Arc<C>,
    policy: RetryPolicy,
    page_size: u32,
}

impl<C: CatalogClient> CandidateFetcher<C> {
    /// 새 수집기를 생성합니다.
    pub fn new(client: Arc<C>, policy: RetryPolicy, page_size: u32) -> Self {
        Self {
            client,
            policy,
            page_size,
        }
    }

    /// 검색어 하나를 조회합니다. 실패하면 빈 목록입니다.
    pub async fn fetch(&self, kind: CatalogKind, term: &str) -> Vec<CandidateProduct> {
        match search_with_retry(self.client.as_ref(), kind, term, self.page_size, self.policy).await
        {
            Ok(products) => products,
            Err(e) => {
                warn!(term = term, catalog = %kind, error = %e, "catalog search failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// 모든 검색어를 동시에 조회하고 제출 순서대로 병합합니다.
    pub async fn fetch_all(&self, kind: CatalogKind, terms: &[String]) -> FetchOutcome {
        let mut tasks = JoinSet::new();
        for (index, term) in terms.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let term = term.clone();
            let policy = self.policy;
            let page_size = self.page_size;
            tasks.spawn(async move {
                let result =
                    search_with_retry(client.as_ref(), kind, &term, page_size, policy).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<Vec<CandidateProduct>, EngineError>>> =
            (0..terms.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(result);
                    }
                }
                Err(e) => warn!(error = %e, "catalog search task failed to join"),
            }
        }

        let mut outcome = FetchOutcome::default();
        for (term, slot) in terms.iter().zip(slots) {
            match slot {
                Some(Ok(products)) => {
                    debug!(term = term.as_str(), count = products.len(), "catalog search succeeded");
                    outcome.candidates.extend(products);
                    outcome.succeeded_terms.push(term.clone());
                }
                Some(Err(e)) => {
                    warn!(term = term.as_str(), catalog = %kind, error = %e, "catalog search failed, treating as empty");
                    outcome.failed_terms.push(term.clone());
                }
                None => outcome.failed_terms.push(term.clone()),
            }
        }
        outcome
    }
}

/// 타임아웃과 지수 백오프 재시도를 포함한 단일 검색
///
/// 재시도는 일시적 실패([`EngineError::is_retryable`])에만 적용됩니다.
async fn search_with_retry<C: CatalogClient>(
    client: &C,
    kind: CatalogKind,
    term: &str,
    page_size: u32,
    policy: RetryPolicy,
) -> Result<Vec<CandidateProduct>, EngineError> {
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let backoff = policy.backoff_for(attempt);
            warn!(
                term = term,
                attempt = attempt,
                backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                "retrying catalog search"
            );
            counter!(m::CATALOG_RETRIES_TOTAL).increment(1);
            tokio::time::sleep(backoff).await;
        }

        let error = match tokio::time::timeout(
            policy.request_timeout,
            client.search(kind, term, page_size),
        )
        .await
        {
            Ok(Ok(products)) => {
                record_request(kind, "success");
                return Ok(products);
            }
            Ok(Err(e)) => e,
            Err(_elapsed) => EngineError::CatalogTimeout {
                term: term.to_owned(),
                timeout_ms: u64::try_from(policy.request_timeout.as_millis()).unwrap_or(u64::MAX),
            },
        };

        record_request(kind, "failure");
        let retryable = error.is_retryable();
        last_error = Some(error);
        if !retryable {
            break;
        }
    }

    Err(last_error.unwrap_or_else(|| EngineError::CatalogRequest {
        term: term.to_owned(),
        reason: "unknown error".to_owned(),
    }))
}

fn record_request(kind: CatalogKind, result: &'static str) {
    let catalog = match kind {
        CatalogKind::Food => "food",
        CatalogKind::PetFood => "pet_food",
    };
    counter!(m::CATALOG_REQUESTS_TOTAL, m::LABEL_CATALOG => catalog, m::LABEL_RESULT => result)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::catalog::MockCatalogClient;

    fn product(barcode: &str) -> CandidateProduct {
        CandidateProduct {
            barcode: barcode.to_owned(),
            name: format!("Product {barcode}"),
            ..Default::default()
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            request_timeout: Duration::from_millis(100),
            max_retries,
            backoff_base: Duration::from_millis(10),
        }
    }

    /// 처음 `failures`번은 실패하고 그 뒤로 성공하는 클라이언트
    struct FlakyClient {
        attempts: Arc<AtomicU32>,
        failures: u32,
        error_status: Option<u16>,
    }

    impl CatalogClient for FlakyClient {
        async fn search(
            &self,
            _kind: CatalogKind,
            term: &str,
            _page_size: u32,
        ) -> Result<Vec<CandidateProduct>, EngineError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(match self.error_status {
                    Some(status) => EngineError::CatalogStatus {
                        term: term.to_owned(),
                        status,
                    },
                    None => EngineError::CatalogRequest {
                        term: term.to_owned(),
                        reason: "connection reset".to_owned(),
                    },
                });
            }
            Ok(vec![product("ok")])
        }
    }

    /// 검색어별로 지연 후 응답하는 클라이언트
    struct DelayedClient;

    impl CatalogClient for DelayedClient {
        async fn search(
            &self,
            _kind: CatalogKind,
            term: &str,
            _page_size: u32,
        ) -> Result<Vec<CandidateProduct>, EngineError> {
            let delay = match term {
                "slow" => 50,
                "medium" => 20,
                "hang" => 10_000,
                _ => 1,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(vec![product(&format!("{term}-1")), product(&format!("{term}-2"))])
        }
    }

    #[test]
    fn backoff_is_exponential() {
        let policy = RetryPolicy {
            backoff_base: Duration::from_millis(500),
            ..fast_policy(3)
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(2000));
    }

    #[test]
    fn default_policy_matches_engine_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.request_timeout, Duration::from_secs(15));
        assert_eq!(policy.max_retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failure_then_succeeds() {
        let attempts = Arc::new(AtomicU32::new(0));
        let client = Arc::new(FlakyClient {
            attempts: Arc::clone(&attempts),
            failures: 1,
            error_status: None,
        });
        let fetcher = CandidateFetcher::new(client, fast_policy(1), 20);

        let found = fetcher.fetch(CatalogKind::Food, "granola").await;
        assert_eq!(found.len(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_resolve_to_empty() {
        let attempts = Arc::new(AtomicU32::new(0));
        let client = Arc::new(FlakyClient {
            attempts: Arc::clone(&attempts),
            failures: u32::MAX,
            error_status: Some(503),
        });
        let fetcher = CandidateFetcher::new(client, fast_policy(2), 20);

        let found = fetcher.fetch(CatalogKind::Food, "granola").await;
        assert!(found.is_empty());
        // initial + 2 retries
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let client = Arc::new(FlakyClient {
            attempts: Arc::clone(&attempts),
            failures: u32::MAX,
            error_status: Some(404),
        });
        let fetcher = CandidateFetcher::new(client, fast_policy(3), 20);

        assert!(fetcher.fetch(CatalogKind::Food, "granola").await.is_empty());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_request_times_out_to_empty() {
        let fetcher = CandidateFetcher::new(Arc::new(DelayedClient), fast_policy(1), 20);
        let outcome = fetcher
            .fetch_all(CatalogKind::Food, &["hang".to_owned()])
            .await;
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.failed_terms, vec!["hang"]);
        assert!(outcome.all_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn merge_follows_submission_order_not_completion_order() {
        let fetcher = CandidateFetcher::new(Arc::new(DelayedClient), fast_policy(0), 20);
        let terms = vec!["slow".to_owned(), "medium".to_owned(), "fast".to_owned()];

        let outcome = fetcher.fetch_all(CatalogKind::Food, &terms).await;
        let barcodes: Vec<&str> = outcome.candidates.iter().map(|c| c.barcode.as_str()).collect();
        assert_eq!(
            barcodes,
            vec!["slow-1", "slow-2", "medium-1", "medium-2", "fast-1", "fast-2"]
        );
        assert_eq!(outcome.succeeded_terms, terms);
        assert!(!outcome.all_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn partial_failure_keeps_successful_terms() {
        let fetcher = CandidateFetcher::new(Arc::new(DelayedClient), fast_policy(0), 20);
        let terms = vec!["hang".to_owned(), "fast".to_owned()];

        let outcome = fetcher.fetch_all(CatalogKind::Food, &terms).await;
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.failed_terms, vec!["hang"]);
        assert_eq!(outcome.succeeded_terms, vec!["fast"]);
    }

    #[tokio::test]
    async fn empty_terms_yield_empty_outcome() {
        let fetcher =
            CandidateFetcher::new(Arc::new(MockCatalogClient::new()), fast_policy(0), 20);
        let outcome = fetcher.fetch_all(CatalogKind::Food, &[]).await;
        assert!(outcome.candidates.is_empty());
        assert!(!outcome.all_failed());
    }

    #[tokio::test]
    async fn failing_client_marks_all_terms_failed() {
        let client = Arc::new(MockCatalogClient::new().with_failing_requests());
        let fetcher = CandidateFetcher::new(client, fast_policy(0), 20);
        let outcome = fetcher
            .fetch_all(CatalogKind::PetFood, &["dog food".to_owned()])
            .await;
        assert!(outcome.all_failed());
    }
}
