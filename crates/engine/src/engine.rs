//! 엔진 오케스트레이터 -- 대체품 검색과 두 제품 비교의 진입점
//!
//! # 대체품 검색 흐름
//!
//! ```text
//! ProductRecord --> ProfileBuilder --> health_score (original)
//!       |
//!       +--> extract_search_terms --> CandidateFetcher (concurrent, per term)
//!                                            |
//!                                     merged candidates
//!                                            |
//!                                  AlternativeRanker --> AlternativesReport
//! ```
//!
//! 엔진은 내부 가변 상태가 없습니다. 같은 엔진을 여러 요청이 동시에 공유할 수 있습니다.

use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use healthswap_core::metrics as m;
use healthswap_core::types::{HealthScore, ProductHealthProfile, ProductRecord};

use crate::catalog::{CatalogClient, HttpCatalogClient};
use crate::compare::{ComparisonInput, ComparisonVerdict, ProductComparator};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fetcher::{CandidateFetcher, RetryPolicy};
use crate::profile::ProfileBuilder;
use crate::quantity::parse_quantity;
use crate::ranker::{AlternativeRanker, AlternativeResult, OriginalProduct};
use crate::score::health_score;
use crate::search_terms::extract_search_terms;
use crate::trend::{ScanHistoryEntry, TrendSummary, summarize};

/// 대체품 검색 결과 상태
///
/// `NoQualifyingCandidates`와 `CatalogUnavailable`은 사용자에게 같은 메시지를 보여주지만
/// 로그와 메트릭에서는 구분됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    /// 대체품이 하나 이상 있음
    Found,
    /// 검색은 성공했지만 원본보다 나은 후보가 없음
    NoQualifyingCandidates,
    /// 모든 검색어의 카탈로그 조회가 실패
    CatalogUnavailable,
    /// 제품명에서 검색어를 만들 수 없음
    NoSearchTerms,
}

impl DiscoveryStatus {
    /// 로그/메트릭용 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NoQualifyingCandidates => "no_qualifying_candidates",
            Self::CatalogUnavailable => "catalog_unavailable",
            Self::NoSearchTerms => "no_search_terms",
        }
    }

    /// 사용자에게 보여줄 메시지
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Found => "Healthier alternatives found",
            Self::NoQualifyingCandidates | Self::CatalogUnavailable | Self::NoSearchTerms => {
                "No healthier alternatives found"
            }
        }
    }
}

impl std::fmt::Display for DiscoveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 대체품 검색 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesReport {
    /// 요청 식별자 (로그 연결용)
    pub request_id: String,
    /// 원본 제품 점수
    pub original_score: HealthScore,
    /// 사용한 검색어
    pub search_terms: Vec<String>,
    /// 순위가 매겨진 대체품
    pub alternatives: Vec<AlternativeResult>,
    /// 결과 상태
    pub status: DiscoveryStatus,
}

/// 더 건강한 대체품 검색 및 비교 엔진
pub struct AlternativesEngine<C: CatalogClient> {
    config: EngineConfig,
    fetcher: CandidateFetcher<C>,
    profiles: ProfileBuilder,
    comparator: ProductComparator,
}

impl AlternativesEngine<HttpCatalogClient> {
    /// HTTP 카탈로그 클라이언트로 엔진을 생성합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 또는 HTTP 클라이언트 생성 실패 시 에러
    pub fn http(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let client = HttpCatalogClient::from_config(&config)?;
        AlternativesEngineBuilder::new()
            .config(config)
            .client(Arc::new(client))
            .build()
    }
}

impl<C: CatalogClient> AlternativesEngine<C> {
    /// 엔진 설정
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 레코드의 건강 프로필을 만듭니다 (회피 목록 적용).
    pub fn profile(&self, record: &ProductRecord) -> ProductHealthProfile {
        self.profiles.build(record)
    }

    /// 레코드의 건강 점수를 계산합니다.
    pub fn score(&self, record: &ProductRecord) -> HealthScore {
        health_score(&self.profile(record))
    }

    /// 레코드의 카탈로그 검색어를 만듭니다.
    pub fn search_terms(&self, record: &ProductRecord) -> Vec<String> {
        extract_search_terms(&record.name, record.categories.as_deref())
    }

    /// 원본보다 엄격하게 건강한 대체품을 찾습니다.
    ///
    /// 네트워크 실패는 에러가 아니라 `CatalogUnavailable` 상태의 빈 보고서로 돌아옵니다.
    ///
    /// # Arguments
    /// - `record`: 원본 제품
    /// - `max_results`: 최대 결과 수 (`None`이면 설정값)
    pub async fn find_healthier_alternatives(
        &self,
        record: &ProductRecord,
        max_results: Option<usize>,
    ) -> AlternativesReport {
        let request_id = Uuid::new_v4().to_string();
        let profile = self.profile(record);
        let original = OriginalProduct::new(
            record.barcode.clone(),
            profile,
            record.quantity.as_deref().and_then(parse_quantity),
        );
        let search_terms = self.search_terms(record);

        info!(
            request_id = %request_id,
            barcode = %record.barcode,
            catalog = %record.catalog,
            original_score = original.score.value(),
            terms = ?search_terms,
            "searching for healthier alternatives"
        );

        if search_terms.is_empty() {
            return self.empty_report(
                request_id,
                original.score,
                search_terms,
                DiscoveryStatus::NoSearchTerms,
            );
        }

        let outcome = self.fetcher.fetch_all(record.catalog, &search_terms).await;
        if outcome.all_failed() {
            warn!(
                request_id = %request_id,
                outcome = DiscoveryStatus::CatalogUnavailable.as_str(),
                failed_terms = ?outcome.failed_terms,
                "catalog unavailable, returning no alternatives"
            );
            return self.empty_report(
                request_id,
                original.score,
                search_terms,
                DiscoveryStatus::CatalogUnavailable,
            );
        }

        let pool_size = outcome.candidates.len();
        let limit = max_results.unwrap_or(self.config.max_results).max(1);
        let ranker = AlternativeRanker::new(
            limit,
            self.config.value_badges,
            self.config.quantity_tolerance_percent,
        );
        let alternatives = ranker.rank(&original, outcome.candidates);

        if alternatives.is_empty() {
            info!(
                request_id = %request_id,
                outcome = DiscoveryStatus::NoQualifyingCandidates.as_str(),
                pool_size = pool_size,
                failed_terms = ?outcome.failed_terms,
                "no candidate beat the original score"
            );
            return self.empty_report(
                request_id,
                original.score,
                search_terms,
                DiscoveryStatus::NoQualifyingCandidates,
            );
        }

        info!(
            request_id = %request_id,
            outcome = DiscoveryStatus::Found.as_str(),
            pool_size = pool_size,
            count = alternatives.len(),
            "healthier alternatives found"
        );
        counter!(m::ALTERNATIVES_FOUND_TOTAL)
            .increment(u64::try_from(alternatives.len()).unwrap_or(u64::MAX));

        AlternativesReport {
            request_id,
            original_score: original.score,
            search_terms,
            alternatives,
            status: DiscoveryStatus::Found,
        }
    }

    /// 두 제품을 비교합니다 (A 관점).
    pub fn compare(&self, a: &ProductRecord, b: &ProductRecord) -> ComparisonVerdict {
        let verdict = self
            .comparator
            .compare(&self.comparison_input(a), &self.comparison_input(b));
        info!(
            barcode_a = %a.barcode,
            barcode_b = %b.barcode,
            score_a = verdict.score_a.value(),
            score_b = verdict.score_b.value(),
            winner = %verdict.winner,
            "compared products"
        );
        verdict
    }

    /// 스캔 기록의 추세를 요약합니다.
    pub fn trend(&self, history: &[ScanHistoryEntry]) -> Option<TrendSummary> {
        summarize(history, self.config.score_tie_margin)
    }

    fn comparison_input(&self, record: &ProductRecord) -> ComparisonInput {
        ComparisonInput {
            profile: self.profile(record),
            allergen_count: u32::try_from(record.allergens.len()).unwrap_or(u32::MAX),
            quantity: record.quantity.as_deref().and_then(parse_quantity),
        }
    }

    fn empty_report(
        &self,
        request_id: String,
        original_score: HealthScore,
        search_terms: Vec<String>,
        status: DiscoveryStatus,
    ) -> AlternativesReport {
        counter!(m::ALTERNATIVES_EMPTY_TOTAL, m::LABEL_REASON => status.as_str()).increment(1);
        AlternativesReport {
            request_id,
            original_score,
            search_terms,
            alternatives: Vec::new(),
            status,
        }
    }
}

/// [`AlternativesEngine`] 빌더
pub struct AlternativesEngineBuilder<C: CatalogClient> {
    config: EngineConfig,
    client: Option<Arc<C>>,
}

impl<C: CatalogClient> AlternativesEngineBuilder<C> {
    /// 기본 설정으로 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            client: None,
        }
    }

    /// 엔진 설정을 지정합니다.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// 카탈로그 클라이언트를 지정합니다.
    pub fn client(mut self, client: Arc<C>) -> Self {
        self.client = Some(client);
        self
    }

    /// 엔진을 빌드합니다.
    ///
    /// # Errors
    ///
    /// - 설정 검증 실패 시 `EngineError::Config`
    /// - 클라이언트가 지정되지 않으면 `EngineError::Config`
    pub fn build(self) -> Result<AlternativesEngine<C>, EngineError> {
        self.config.validate()?;

        let client = self.client.ok_or_else(|| EngineError::Config {
            field: "client".to_owned(),
            reason: "catalog client is required".to_owned(),
        })?;

        let fetcher = CandidateFetcher::new(
            client,
            RetryPolicy::from_config(&self.config),
            self.config.page_size,
        );
        let profiles = ProfileBuilder::new(&self.config.avoid_ingredients);
        let comparator = ProductComparator::new(
            self.config.score_tie_margin,
            self.config.quantity_tolerance_percent,
        );

        Ok(AlternativesEngine {
            config: self.config,
            fetcher,
            profiles,
            comparator,
        })
    }
}

impl<C: CatalogClient> Default for AlternativesEngineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
