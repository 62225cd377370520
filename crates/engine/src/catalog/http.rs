//! reqwest 기반 카탈로그 클라이언트

use std::time::Duration;

use healthswap_core::types::CatalogKind;

use super::wire::{SEARCH_FIELDS, decode_search_response};
use super::{CandidateProduct, CatalogClient};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// HTTP 카탈로그 클라이언트
///
/// 카탈로그 종류에 따라 일반 식품/반려동물 사료 엔드포인트를 선택합니다.
/// 인증은 없으며 모든 요청에 User-Agent 헤더를 보냅니다.
pub struct HttpCatalogClient {
    client: reqwest::Client,
    food_base_url: String,
    pet_food_base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    /// 엔진 설정으로 클라이언트를 생성합니다.
    ///
    /// # Errors
    ///
    /// TLS 백엔드 초기화 등에 실패하면 `EngineError::ClientBuild`
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EngineError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            food_base_url: config.food_base_url.trim_end_matches('/').to_owned(),
            pet_food_base_url: config.pet_food_base_url.trim_end_matches('/').to_owned(),
            timeout: config.request_timeout,
        })
    }

    fn search_url(&self, kind: CatalogKind) -> String {
        let base = match kind {
            CatalogKind::Food => &self.food_base_url,
            CatalogKind::PetFood => &self.pet_food_base_url,
        };
        format!("{base}/cgi/search.pl")
    }

    fn map_send_error(&self, term: &str, err: &reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::CatalogTimeout {
                term: term.to_owned(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            EngineError::CatalogRequest {
                term: term.to_owned(),
                reason: err.to_string(),
            }
        }
    }
}

impl CatalogClient for HttpCatalogClient {
    async fn search(
        &self,
        kind: CatalogKind,
        term: &str,
        page_size: u32,
    ) -> Result<Vec<CandidateProduct>, EngineError> {
        let page_size = page_size.to_string();
        let response = self
            .client
            .get(self.search_url(kind))
            .query(&[
                ("search_terms", term),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(term, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::CatalogStatus {
                term: term.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(term, &e))?;

        decode_search_response(term, &body)
    }
}
