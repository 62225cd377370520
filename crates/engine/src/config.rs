//! 엔진 설정
//!
//! [`EngineConfig`]는 core의 [`CatalogConfig`](healthswap_core::config::CatalogConfig)와
//! [`RankingConfig`](healthswap_core::config::RankingConfig)를 하나로 묶어
//! 엔진이 직접 쓰는 형태(`Duration` 등)로 변환합니다.
//!
//! # 사용 예시
//!
//! ```
//! use healthswap_engine::EngineConfigBuilder;
//!
//! let config = EngineConfigBuilder::new()
//!     .max_results(3)
//!     .avoid_ingredients(vec!["palm oil".to_owned()])
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_results, 3);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use healthswap_core::config::HealthswapConfig;
use healthswap_core::types::CatalogKind;

use crate::error::EngineError;

/// 설정 상한값 상수
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_RETRIES: u32 = 5;
const MAX_BACKOFF_BASE_MS: u64 = 10_000;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_RESULTS_LIMIT: usize = 50;
const MAX_SCORE_TIE_MARGIN: u8 = 50;
const MAX_QUANTITY_TOLERANCE_PERCENT: f64 = 50.0;

/// 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 일반 식품 카탈로그 기본 URL
    pub food_base_url: String,
    /// 반려동물 사료 카탈로그 기본 URL
    pub pet_food_base_url: String,
    /// User-Agent 헤더
    pub user_agent: String,
    /// 카탈로그 요청 타임아웃
    pub request_timeout: Duration,
    /// 재시도 횟수
    pub max_retries: u32,
    /// 지수 백오프 기본 간격 (밀리초)
    pub retry_backoff_base_ms: u64,
    /// 검색어당 요청 후보 수
    pub page_size: u32,
    /// 반환할 최대 대체품 수
    pub max_results: usize,
    /// 비교 판정 무승부 점수 차
    pub score_tie_margin: u8,
    /// 용량 비교 허용 오차 (%)
    pub quantity_tolerance_percent: f64,
    /// 가성비 배지 부착 여부
    pub value_badges: bool,
    /// 회피 성분 목록
    pub avoid_ingredients: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_core(&HealthswapConfig::default())
    }
}

impl EngineConfig {
    /// core 설정에서 엔진 설정을 생성합니다.
    pub fn from_core(core: &HealthswapConfig) -> Self {
        Self {
            food_base_url: core.catalog.food_base_url.clone(),
            pet_food_base_url: core.catalog.pet_food_base_url.clone(),
            user_agent: core.catalog.user_agent.clone(),
            request_timeout: Duration::from_secs(core.catalog.request_timeout_secs),
            max_retries: core.catalog.max_retries,
            retry_backoff_base_ms: core.catalog.retry_backoff_base_ms,
            page_size: core.catalog.page_size,
            max_results: core.ranking.max_results,
            score_tie_margin: core.ranking.score_tie_margin,
            quantity_tolerance_percent: core.ranking.quantity_tolerance_percent,
            value_badges: core.ranking.value_badges,
            avoid_ingredients: core.ranking.avoid_ingredients.clone(),
        }
    }

    /// 카탈로그 종류에 맞는 기본 URL을 반환합니다.
    pub fn base_url(&self, kind: CatalogKind) -> &str {
        match kind {
            CatalogKind::Food => &self.food_base_url,
            CatalogKind::PetFood => &self.pet_food_base_url,
        }
    }

    /// 재시도 백오프 기본 간격
    pub fn retry_backoff_base(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_base_ms)
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - base URL: `http://` 또는 `https://`로 시작
    /// - `request_timeout`: 1ms-120s
    /// - `max_retries`: 0-5
    /// - `retry_backoff_base_ms`: 0-10000
    /// - `page_size`: 1-100
    /// - `max_results`: 1-50
    /// - `score_tie_margin`: 0-50
    /// - `quantity_tolerance_percent`: 0-50
    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, url) in [
            ("food_base_url", &self.food_base_url),
            ("pet_food_base_url", &self.pet_food_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(EngineError::Config {
                    field: field.to_owned(),
                    reason: "must start with http:// or https://".to_owned(),
                });
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(EngineError::Config {
                field: "user_agent".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.request_timeout.is_zero() || self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(EngineError::Config {
                field: "request_timeout".to_owned(),
                reason: format!("must be greater than 0 and at most {MAX_REQUEST_TIMEOUT:?}"),
            });
        }

        if self.max_retries > MAX_RETRIES {
            return Err(EngineError::Config {
                field: "max_retries".to_owned(),
                reason: format!("must be 0-{MAX_RETRIES}"),
            });
        }

        if self.retry_backoff_base_ms > MAX_BACKOFF_BASE_MS {
            return Err(EngineError::Config {
                field: "retry_backoff_base_ms".to_owned(),
                reason: format!("must be 0-{MAX_BACKOFF_BASE_MS}"),
            });
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(EngineError::Config {
                field: "page_size".to_owned(),
                reason: format!("must be 1-{MAX_PAGE_SIZE}"),
            });
        }

        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            return Err(EngineError::Config {
                field: "max_results".to_owned(),
                reason: format!("must be 1-{MAX_RESULTS_LIMIT}"),
            });
        }

        if self.score_tie_margin > MAX_SCORE_TIE_MARGIN {
            return Err(EngineError::Config {
                field: "score_tie_margin".to_owned(),
                reason: format!("must be 0-{MAX_SCORE_TIE_MARGIN}"),
            });
        }

        if !(0.0..=MAX_QUANTITY_TOLERANCE_PERCENT).contains(&self.quantity_tolerance_percent) {
            return Err(EngineError::Config {
                field: "quantity_tolerance_percent".to_owned(),
                reason: format!("must be 0-{MAX_QUANTITY_TOLERANCE_PERCENT}"),
            });
        }

        if self.avoid_ingredients.iter().any(|t| t.trim().is_empty()) {
            return Err(EngineError::Config {
                field: "avoid_ingredients".to_owned(),
                reason: "entries must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// [`EngineConfig`] 빌더
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 일반 식품 카탈로그 URL을 설정합니다.
    pub fn food_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.food_base_url = url.into();
        self
    }

    /// 반려동물 사료 카탈로그 URL을 설정합니다.
    pub fn pet_food_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.pet_food_base_url = url.into();
        self
    }

    /// User-Agent를 설정합니다.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// 요청 타임아웃을 설정합니다.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// 재시도 횟수를 설정합니다.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// 백오프 기본 간격(밀리초)을 설정합니다.
    pub fn retry_backoff_base_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_base_ms = ms;
        self
    }

    /// 검색어당 후보 수를 설정합니다.
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    /// 최대 결과 수를 설정합니다.
    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    /// 무승부 점수 차를 설정합니다.
    pub fn score_tie_margin(mut self, margin: u8) -> Self {
        self.config.score_tie_margin = margin;
        self
    }

    /// 용량 비교 허용 오차(%)를 설정합니다.
    pub fn quantity_tolerance_percent(mut self, percent: f64) -> Self {
        self.config.quantity_tolerance_percent = percent;
        self
    }

    /// 가성비 배지 부착 여부를 설정합니다.
    pub fn value_badges(mut self, enabled: bool) -> Self {
        self.config.value_badges = enabled;
        self
    }

    /// 회피 성분 목록을 설정합니다.
    pub fn avoid_ingredients(mut self, terms: Vec<String>) -> Self {
        self.config.avoid_ingredients = terms;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `EngineError::Config` 반환
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = HealthswapConfig::default();
        core.catalog.request_timeout_secs = 7;
        core.catalog.max_retries = 3;
        core.ranking.max_results = 8;
        core.ranking.score_tie_margin = 2;
        core.ranking.quantity_tolerance_percent = 10.0;
        core.ranking.avoid_ingredients = vec!["sugar".to_owned()];

        let config = EngineConfig::from_core(&core);
        assert_eq!(config.request_timeout, Duration::from_secs(7));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_results, 8);
        assert_eq!(config.score_tie_margin, 2);
        assert!((config.quantity_tolerance_percent - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.avoid_ingredients, vec!["sugar"]);
    }

    #[test]
    fn tolerances_are_independent() {
        let config = EngineConfigBuilder::new()
            .score_tie_margin(0)
            .quantity_tolerance_percent(20.0)
            .build()
            .unwrap();
        assert_eq!(config.score_tie_margin, 0);
        assert!((config.quantity_tolerance_percent - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn base_url_selects_catalog() {
        let config = EngineConfig::default();
        assert_eq!(
            config.base_url(CatalogKind::Food),
            "https://world.openfoodfacts.org"
        );
        assert_eq!(
            config.base_url(CatalogKind::PetFood),
            "https://world.openpetfoodfacts.org"
        );
    }

    #[test]
    fn builder_rejects_zero_max_results() {
        let err = EngineConfigBuilder::new().max_results(0).build().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let result = EngineConfigBuilder::new()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_non_http_url() {
        let result = EngineConfigBuilder::new()
            .food_base_url("ftp://example.org")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_too_many_retries() {
        assert!(EngineConfigBuilder::new().max_retries(6).build().is_err());
    }

    #[test]
    fn builder_rejects_page_size_out_of_range() {
        assert!(EngineConfigBuilder::new().page_size(0).build().is_err());
        assert!(EngineConfigBuilder::new().page_size(101).build().is_err());
    }

    #[test]
    fn builder_rejects_nan_tolerance() {
        let result = EngineConfigBuilder::new()
            .quantity_tolerance_percent(f64::NAN)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_blank_avoid_term() {
        let result = EngineConfigBuilder::new()
            .avoid_ingredients(vec!["msg".to_owned(), "  ".to_owned()])
            .build();
        assert!(result.is_err());
    }
}
