//! 설정 관리 — healthswap.toml 파싱 및 런타임 설정
//!
//! [`HealthswapConfig`]는 모든 계층의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HEALTHSWAP_CATALOG_REQUEST_TIMEOUT_SECS=10` 형식)
//! 3. 설정 파일 (`healthswap.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), healthswap_core::error::HealthswapError> {
//! use healthswap_core::config::HealthswapConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HealthswapConfig::load("healthswap.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HealthswapConfig::parse("[ranking]\nmax_results = 3")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, HealthswapError};

/// 설정 상한값 상수
const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_RETRIES: u32 = 5;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_RESULTS_LIMIT: usize = 50;
const MAX_SCORE_TIE_MARGIN: u8 = 50;
const MAX_QUANTITY_TOLERANCE_PERCENT: f64 = 50.0;

/// HealthSwap 통합 설정
///
/// `healthswap.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 계층은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthswapConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 카탈로그 검색 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// 대체품 순위/비교 설정
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl HealthswapConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HealthswapError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HealthswapError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HealthswapError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HealthswapError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HealthswapError> {
        toml::from_str(toml_str).map_err(|e| {
            HealthswapError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HEALTHSWAP_{SECTION}_{FIELD}`
    /// 예: `HEALTHSWAP_RANKING_MAX_RESULTS=3`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HEALTHSWAP_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HEALTHSWAP_GENERAL_LOG_FORMAT");

        // Catalog
        override_string(
            &mut self.catalog.food_base_url,
            "HEALTHSWAP_CATALOG_FOOD_BASE_URL",
        );
        override_string(
            &mut self.catalog.pet_food_base_url,
            "HEALTHSWAP_CATALOG_PET_FOOD_BASE_URL",
        );
        override_string(&mut self.catalog.user_agent, "HEALTHSWAP_CATALOG_USER_AGENT");
        override_u64(
            &mut self.catalog.request_timeout_secs,
            "HEALTHSWAP_CATALOG_REQUEST_TIMEOUT_SECS",
        );
        override_u32(&mut self.catalog.max_retries, "HEALTHSWAP_CATALOG_MAX_RETRIES");
        override_u64(
            &mut self.catalog.retry_backoff_base_ms,
            "HEALTHSWAP_CATALOG_RETRY_BACKOFF_BASE_MS",
        );
        override_u32(&mut self.catalog.page_size, "HEALTHSWAP_CATALOG_PAGE_SIZE");

        // Ranking
        override_usize(&mut self.ranking.max_results, "HEALTHSWAP_RANKING_MAX_RESULTS");
        override_u8(
            &mut self.ranking.score_tie_margin,
            "HEALTHSWAP_RANKING_SCORE_TIE_MARGIN",
        );
        override_f64(
            &mut self.ranking.quantity_tolerance_percent,
            "HEALTHSWAP_RANKING_QUANTITY_TOLERANCE_PERCENT",
        );
        override_bool(&mut self.ranking.value_badges, "HEALTHSWAP_RANKING_VALUE_BADGES");
        override_csv(
            &mut self.ranking.avoid_ingredients,
            "HEALTHSWAP_RANKING_AVOID_INGREDIENTS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HealthswapError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.catalog.validate()?;
        self.ranking.validate()?;

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 카탈로그 검색 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 일반 식품 카탈로그 기본 URL
    pub food_base_url: String,
    /// 반려동물 사료 카탈로그 기본 URL
    pub pet_food_base_url: String,
    /// 요청마다 보내는 클라이언트 식별 헤더 (User-Agent)
    pub user_agent: String,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 재시도 횟수 (멱등 GET에만 적용)
    pub max_retries: u32,
    /// 지수 백오프 기본 간격 (밀리초)
    pub retry_backoff_base_ms: u64,
    /// 검색어당 요청할 후보 수
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            food_base_url: "https://world.openfoodfacts.org".to_owned(),
            pet_food_base_url: "https://world.openpetfoodfacts.org".to_owned(),
            user_agent: "HealthSwap/0.1 (+https://github.com/healthswap/healthswap)".to_owned(),
            request_timeout_secs: 15,
            max_retries: 1,
            retry_backoff_base_ms: 500,
            page_size: 20,
        }
    }
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("catalog.food_base_url", &self.food_base_url),
            ("catalog.pet_food_base_url", &self.pet_food_base_url),
        ] {
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "must not be empty".to_owned(),
                });
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "must start with http:// or https://".to_owned(),
                });
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.user_agent".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "catalog.request_timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_REQUEST_TIMEOUT_SECS}"),
            });
        }

        if self.max_retries > MAX_RETRIES {
            return Err(ConfigError::InvalidValue {
                field: "catalog.max_retries".to_owned(),
                reason: format!("must be 0-{MAX_RETRIES}"),
            });
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "catalog.page_size".to_owned(),
                reason: format!("must be 1-{MAX_PAGE_SIZE}"),
            });
        }

        Ok(())
    }
}

/// 대체품 순위/비교 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// 반환할 최대 대체품 수
    pub max_results: usize,
    /// 비교 판정에서 무승부로 보는 점수 차 (이 값 미만이면 tie)
    pub score_tie_margin: u8,
    /// 용량 비교에서 "같은 크기"로 보는 백분율 차 (이 값 미만이면 같음)
    pub quantity_tolerance_percent: f64,
    /// 가성비 배지 부착 여부
    pub value_badges: bool,
    /// 사용자 회피 성분 목록
    pub avoid_ingredients: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            score_tie_margin: 5,
            quantity_tolerance_percent: 5.0,
            value_badges: true,
            avoid_ingredients: Vec::new(),
        }
    }
}

impl RankingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "ranking.max_results".to_owned(),
                reason: format!("must be 1-{MAX_RESULTS_LIMIT}"),
            });
        }

        if self.score_tie_margin > MAX_SCORE_TIE_MARGIN {
            return Err(ConfigError::InvalidValue {
                field: "ranking.score_tie_margin".to_owned(),
                reason: format!("must be 0-{MAX_SCORE_TIE_MARGIN}"),
            });
        }

        if !(0.0..=MAX_QUANTITY_TOLERANCE_PERCENT).contains(&self.quantity_tolerance_percent) {
            return Err(ConfigError::InvalidValue {
                field: "ranking.quantity_tolerance_percent".to_owned(),
                reason: format!("must be 0-{MAX_QUANTITY_TOLERANCE_PERCENT}"),
            });
        }

        if self.avoid_ingredients.iter().any(|term| term.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "ranking.avoid_ingredients".to_owned(),
                reason: "entries must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u8(target: &mut u8, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u8>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u8 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_f64(target: &mut f64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => *target = parsed,
            _ => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse f64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = HealthswapConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.catalog.request_timeout_secs, 15);
        assert_eq!(config.catalog.max_retries, 1);
        assert_eq!(config.ranking.max_results, 5);
        assert_eq!(config.ranking.score_tie_margin, 5);
        assert!(config.ranking.value_badges);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = HealthswapConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = HealthswapConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.catalog.page_size, 20);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[ranking]
max_results = 3
avoid_ingredients = ["palm oil", "aspartame"]
"#;
        let config = HealthswapConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.ranking.max_results, 3);
        assert_eq!(config.ranking.avoid_ingredients.len(), 2);
        assert_eq!(config.ranking.score_tie_margin, 5);
    }

    #[test]
    fn from_str_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "pretty"

[catalog]
food_base_url = "https://fr.openfoodfacts.org"
pet_food_base_url = "https://fr.openpetfoodfacts.org"
user_agent = "HealthSwapTest/1.0"
request_timeout_secs = 10
max_retries = 2
retry_backoff_base_ms = 250
page_size = 40

[ranking]
max_results = 8
score_tie_margin = 3
quantity_tolerance_percent = 2.5
value_badges = false
avoid_ingredients = ["sucralose"]
"#;
        let config = HealthswapConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.catalog.max_retries, 2);
        assert_eq!(config.catalog.page_size, 40);
        assert_eq!(config.ranking.max_results, 8);
        assert!((config.ranking.quantity_tolerance_percent - 2.5).abs() < f64::EPSILON);
        assert!(!config.ranking.value_badges);
        config.validate().unwrap();
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = HealthswapConfig::parse("invalid = [[[toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            HealthswapError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = HealthswapConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = HealthswapConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = HealthswapConfig::default();
        config.catalog.food_base_url = "ftp://example.org".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("food_base_url"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = HealthswapConfig::default();
        config.catalog.request_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn validate_rejects_too_many_retries() {
        let mut config = HealthswapConfig::default();
        config.catalog.max_retries = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_zero_retries() {
        let mut config = HealthswapConfig::default();
        config.catalog.max_retries = 0;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_zero_max_results() {
        let mut config = HealthswapConfig::default();
        config.ranking.max_results = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn validate_rejects_negative_quantity_tolerance() {
        let mut config = HealthswapConfig::default();
        config.ranking.quantity_tolerance_percent = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_avoid_ingredient() {
        let mut config = HealthswapConfig::default();
        config.ranking.avoid_ingredients = vec!["palm oil".to_owned(), "  ".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("avoid_ingredients"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HEALTHSWAP_STR", "overridden") };
        override_string(&mut val, "TEST_HEALTHSWAP_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_HEALTHSWAP_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HEALTHSWAP_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_HEALTHSWAP_BOOL_BAD");
        assert!(val); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_HEALTHSWAP_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_f64_rejects_nan() {
        let mut val = 5.0;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HEALTHSWAP_F64", "NaN") };
        override_f64(&mut val, "TEST_HEALTHSWAP_F64");
        assert!((val - 5.0).abs() < f64::EPSILON);
        unsafe { std::env::remove_var("TEST_HEALTHSWAP_F64") };
    }

    #[test]
    #[serial]
    fn env_override_csv_skips_blank_entries() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HEALTHSWAP_CSV", "palm oil, ,aspartame") };
        override_csv(&mut val, "TEST_HEALTHSWAP_CSV");
        assert_eq!(val, vec!["palm oil", "aspartame"]);
        unsafe { std::env::remove_var("TEST_HEALTHSWAP_CSV") };
    }

    #[test]
    #[serial]
    fn apply_env_overrides_updates_sections() {
        let mut config = HealthswapConfig::default();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe {
            std::env::set_var("HEALTHSWAP_RANKING_MAX_RESULTS", "3");
            std::env::set_var("HEALTHSWAP_CATALOG_MAX_RETRIES", "2");
        }
        config.apply_env_overrides();
        assert_eq!(config.ranking.max_results, 3);
        assert_eq!(config.catalog.max_retries, 2);
        unsafe {
            std::env::remove_var("HEALTHSWAP_RANKING_MAX_RESULTS");
            std::env::remove_var("HEALTHSWAP_CATALOG_MAX_RETRIES");
        }
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = 7u64;
        override_u64(&mut val, "TEST_HEALTHSWAP_NONEXISTENT_12345");
        assert_eq!(val, 7);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = HealthswapConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = HealthswapConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.catalog.food_base_url, parsed.catalog.food_base_url);
        assert_eq!(config.ranking.max_results, parsed.ranking.max_results);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = HealthswapConfig::from_file("/nonexistent/path/healthswap.toml").await;
        assert!(matches!(
            result,
            Err(HealthswapError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
