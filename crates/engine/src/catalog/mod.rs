//! 카탈로그 검색 추상화
//!
//! [`CatalogClient`] 트레이트는 외부 제품 카탈로그 검색 API를 추상화합니다.
//! 운영 코드는 [`HttpCatalogClient`]를, 테스트는 `MockCatalogClient`를 사용합니다.
//! 클라이언트는 명시적으로 주입되며 모듈 수준 전역 상태가 없습니다.
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────────┐
//!   │ CandidateFetcher │  (timeout + retry)
//!   └────────┬─────────┘
//!            │
//!            ▼
//!    ┌───────────────┐
//!    │ CatalogClient │ (trait)
//!    └───────────────┘
//!        │       │
//!        ▼       ▼
//!   ┌──────┐  ┌──────┐
//!   │ Http │  │ Mock │
//!   └──┬───┘  └──────┘
//!      │
//!      ▼
//!   food / pet-food catalog
//! ```

mod http;
mod wire;

use std::future::Future;

use serde::{Deserialize, Serialize};

use healthswap_core::types::{CatalogKind, NovaGroup, NutriScoreGrade, ProductHealthProfile};

use crate::error::EngineError;

pub use http::HttpCatalogClient;
pub use wire::decode_search_response;

/// 카탈로그 검색 결과의 후보 제품
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProduct {
    /// 바코드 (카탈로그 식별자)
    pub barcode: String,
    /// 표시 이름
    pub name: String,
    /// 브랜드
    pub brand: Option<String>,
    /// 이미지 URL
    pub image_url: Option<String>,
    /// Nutri-Score 등급
    pub nutriscore_grade: Option<NutriScoreGrade>,
    /// NOVA 그룹
    pub nova_group: Option<NovaGroup>,
    /// 첨가물 수
    pub additive_count: u32,
    /// 포장 용량 원문
    pub quantity: Option<String>,
}

impl CandidateProduct {
    /// 후보의 건강 프로필을 만듭니다.
    ///
    /// 카탈로그 검색 결과에는 성분 목록이 없으므로 회피 성분 수는 0이고 힌트도 없습니다.
    pub fn to_profile(&self) -> ProductHealthProfile {
        ProductHealthProfile {
            nutriscore_grade: self.nutriscore_grade,
            nova_group: self.nova_group,
            flagged_ingredient_count: 0,
            additive_count: self.additive_count,
            health_rating_hint: None,
        }
    }

    /// 표시 가능한 이름이 있는지 확인합니다.
    pub fn has_display_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// 카탈로그 검색 트레이트
///
/// 구현체는 한 번의 검색 요청만 수행합니다. 타임아웃과 재시도는
/// [`CandidateFetcher`](crate::fetcher::CandidateFetcher)가 담당합니다.
///
/// # Errors
///
/// - `EngineError::CatalogRequest`: 연결 실패
/// - `EngineError::CatalogTimeout`: 요청 타임아웃
/// - `EngineError::CatalogStatus`: 2xx가 아닌 응답
/// - `EngineError::CatalogDecode`: 응답 본문 해석 실패
pub trait CatalogClient: Send + Sync + 'static {
    /// 검색어로 카탈로그를 검색합니다.
    fn search(
        &self,
        kind: CatalogKind,
        term: &str,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<CandidateProduct>, EngineError>> + Send;
}

/// 테스트용 Mock 카탈로그 클라이언트
///
/// 검색어별로 고정 응답을 반환합니다. 등록되지 않은 검색어는 빈 목록입니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockCatalogClient {
    /// 검색어 → 응답
    pub responses: std::collections::HashMap<String, Vec<CandidateProduct>>,
    /// 모든 호출을 실패시킬지 여부
    pub fail_all: bool,
}

#[cfg(test)]
impl MockCatalogClient {
    /// 빈 mock 클라이언트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 검색어에 대한 응답을 등록합니다.
    pub fn with_response(mut self, term: &str, products: Vec<CandidateProduct>) -> Self {
        self.responses.insert(term.to_owned(), products);
        self
    }

    /// 모든 호출이 연결 실패하도록 설정합니다.
    pub fn with_failing_requests(mut self) -> Self {
        self.fail_all = true;
        self
    }
}

#[cfg(test)]
impl CatalogClient for MockCatalogClient {
    async fn search(
        &self,
        _kind: CatalogKind,
        term: &str,
        _page_size: u32,
    ) -> Result<Vec<CandidateProduct>, EngineError> {
        if self.fail_all {
            return Err(EngineError::CatalogRequest {
                term: term.to_owned(),
                reason: "mock failure".to_owned(),
            });
        }
        Ok(self.responses.get(term).cloned().unwrap_or_default())
    }
}
