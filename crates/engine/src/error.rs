//! 엔진 에러 타입
//!
//! [`EngineError`]는 엔진 내부에서 발생할 수 있는 에러를 나타냅니다.
//! 카탈로그 에러는 대체품 검색 흐름 안에서 빈 결과로 흡수되며 호출자에게 전파되지 않습니다.
//! `From<EngineError> for HealthswapError` 구현으로 빌더/설정 에러는 `?`로 상위에 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **카탈로그**: `CatalogRequest`, `CatalogTimeout`, `CatalogStatus`, `CatalogDecode`
//! - **설정**: `Config`, `ClientBuild`

use healthswap_core::error::{CatalogError, ConfigError, HealthswapError};

/// 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 카탈로그 요청 실패 (연결, DNS, TLS)
    #[error("catalog request failed for '{term}': {reason}")]
    CatalogRequest {
        /// 검색어
        term: String,
        /// 실패 사유
        reason: String,
    },

    /// 카탈로그 요청 타임아웃
    #[error("catalog request for '{term}' timed out after {timeout_ms}ms")]
    CatalogTimeout {
        /// 검색어
        term: String,
        /// 적용된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 2xx가 아닌 응답
    #[error("catalog returned status {status} for '{term}'")]
    CatalogStatus {
        /// 검색어
        term: String,
        /// HTTP 상태 코드
        status: u16,
    },

    /// 응답 본문 디코딩 실패
    #[error("catalog response decode failed for '{term}': {reason}")]
    CatalogDecode {
        /// 검색어
        term: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// HTTP 클라이언트 생성 실패
    #[error("failed to build catalog client: {0}")]
    ClientBuild(String),
}

impl EngineError {
    /// 재시도로 회복될 수 있는 일시적 실패인지 확인합니다.
    ///
    /// 타임아웃, 연결 실패, 5xx, 429가 해당됩니다.
    /// 디코딩 실패와 4xx는 같은 요청을 반복해도 결과가 같으므로 제외합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CatalogRequest { .. } | Self::CatalogTimeout { .. } => true,
            Self::CatalogStatus { status, .. } => *status == 429 || *status >= 500,
            Self::CatalogDecode { .. } | Self::Config { .. } | Self::ClientBuild(_) => false,
        }
    }
}

impl From<EngineError> for HealthswapError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::CatalogRequest { term, reason } => {
                HealthswapError::Catalog(CatalogError::Request(format!("{term}: {reason}")))
            }
            EngineError::CatalogTimeout { term, timeout_ms } => HealthswapError::Catalog(
                CatalogError::Timeout(format!("{term}: after {timeout_ms}ms")),
            ),
            EngineError::CatalogStatus { term, status } => {
                HealthswapError::Catalog(CatalogError::Status(format!("{term}: {status}")))
            }
            EngineError::CatalogDecode { term, reason } => {
                HealthswapError::Catalog(CatalogError::Decode(format!("{term}: {reason}")))
            }
            EngineError::Config { field, reason } => {
                HealthswapError::Config(ConfigError::InvalidValue { field, reason })
            }
            EngineError::ClientBuild(msg) => HealthswapError::Catalog(CatalogError::Request(
                format!("client build failed: {msg}"),
            )),
        }
    }
}
