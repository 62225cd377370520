//! 카탈로그 응답 디코딩
//!
//! 카탈로그 JSON은 필드 타입이 일정하지 않습니다 (바코드가 숫자이거나,
//! NOVA 그룹이 문자열이거나, Nutri-Score가 `"unknown"`인 경우).
//! 필드 단위로 관대하게 해석하고, 해석할 수 없는 항목은 건너뜁니다.

use serde::Deserialize;
use serde_json::Value;

use healthswap_core::types::{NovaGroup, NutriScoreGrade};

use super::CandidateProduct;
use crate::error::EngineError;

/// 검색 요청 시 받을 필드 목록
pub(crate) const SEARCH_FIELDS: &str = "code,product_name,generic_name,brands,image_url,\
nutriscore_grade,nova_group,additives_tags,additives_n,quantity";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProduct {
    code: Option<Value>,
    product_name: Option<Value>,
    generic_name: Option<Value>,
    brands: Option<Value>,
    image_url: Option<Value>,
    nutriscore_grade: Option<Value>,
    nova_group: Option<Value>,
    additives_tags: Option<Vec<Value>>,
    additives_n: Option<Value>,
    quantity: Option<Value>,
}

/// 검색 응답 본문을 후보 목록으로 디코딩합니다.
///
/// 최상위 JSON이 잘못되면 `CatalogDecode` 에러이며,
/// 개별 항목의 문제는 해당 항목만 건너뜁니다.
pub fn decode_search_response(
    term: &str,
    body: &[u8],
) -> Result<Vec<CandidateProduct>, EngineError> {
    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|e| EngineError::CatalogDecode {
            term: term.to_owned(),
            reason: e.to_string(),
        })?;

    Ok(response
        .products
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawProduct>(value).ok())
        .filter_map(RawProduct::into_candidate)
        .collect())
}

impl RawProduct {
    fn into_candidate(self) -> Option<CandidateProduct> {
        let barcode = self.code.as_ref().and_then(text_of)?;

        let name = self
            .product_name
            .as_ref()
            .and_then(text_of)
            .or_else(|| self.generic_name.as_ref().and_then(text_of))
            .unwrap_or_default();

        // "Brand A, Brand B" → 첫 번째 브랜드
        let brand = self
            .brands
            .as_ref()
            .and_then(text_of)
            .and_then(|b| b.split(',').map(str::trim).find(|s| !s.is_empty()).map(str::to_owned));

        let nutriscore_grade = self
            .nutriscore_grade
            .as_ref()
            .and_then(text_of)
            .and_then(|g| NutriScoreGrade::from_str_loose(&g));

        let nova_group = self
            .nova_group
            .as_ref()
            .and_then(number_of)
            .and_then(|n| u8::try_from(n).ok())
            .and_then(NovaGroup::from_number);

        let additive_count = self
            .additives_n
            .as_ref()
            .and_then(number_of)
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| {
                self.additives_tags
                    .as_ref()
                    .map(|tags| u32::try_from(tags.len()).unwrap_or(u32::MAX))
            })
            .unwrap_or(0);

        Some(CandidateProduct {
            barcode,
            name,
            brand,
            image_url: self.image_url.as_ref().and_then(text_of),
            nutriscore_grade,
            nova_group,
            additive_count,
            quantity: self.quantity.as_ref().and_then(text_of),
        })
    }
}

/// 문자열 또는 숫자를 공백 제거된 문자열로. 빈 문자열은 없음으로 취급합니다.
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// 숫자 또는 숫자 문자열을 정수로
fn number_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Vec<CandidateProduct> {
        decode_search_response("test", json.as_bytes()).unwrap()
    }

    #[test]
    fn decodes_full_product() {
        let products = decode(
            r#"{"count": 1, "products": [{
                "code": "3017620422003",
                "product_name": "Hazelnut Spread",
                "brands": "Ferrero, Nutella",
                "image_url": "https://images.example/1.jpg",
                "nutriscore_grade": "e",
                "nova_group": 4,
                "additives_tags": ["en:e322", "en:e476"],
                "quantity": "400 g"
            }]}"#,
        );
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.barcode, "3017620422003");
        assert_eq!(p.name, "Hazelnut Spread");
        assert_eq!(p.brand.as_deref(), Some("Ferrero"));
        assert_eq!(p.nutriscore_grade, Some(NutriScoreGrade::E));
        assert_eq!(p.nova_group, Some(NovaGroup::UltraProcessed));
        assert_eq!(p.additive_count, 2);
        assert_eq!(p.quantity.as_deref(), Some("400 g"));
    }

    #[test]
    fn accepts_numeric_code_and_string_nova() {
        let products = decode(r#"{"products": [{"code": 12345, "product_name": "X", "nova_group": "2"}]}"#);
        assert_eq!(products[0].barcode, "12345");
        assert_eq!(products[0].nova_group, Some(NovaGroup::CulinaryIngredient));
    }

    #[test]
    fn unknown_grades_become_none() {
        let products = decode(
            r#"{"products": [{"code": "1", "product_name": "X",
                "nutriscore_grade": "not-applicable", "nova_group": 9}]}"#,
        );
        assert!(products[0].nutriscore_grade.is_none());
        assert!(products[0].nova_group.is_none());
    }

    #[test]
    fn additives_n_takes_precedence_over_tags() {
        let products = decode(
            r#"{"products": [{"code": "1", "additives_n": 1, "additives_tags": ["a", "b", "c"]}]}"#,
        );
        assert_eq!(products[0].additive_count, 1);
    }

    #[test]
    fn falls_back_to_generic_name() {
        let products =
            decode(r#"{"products": [{"code": "1", "product_name": "  ", "generic_name": "Oat drink"}]}"#);
        assert_eq!(products[0].name, "Oat drink");
    }

    #[test]
    fn skips_products_without_code() {
        let products = decode(
            r#"{"products": [{"product_name": "No code"}, {"code": "", "product_name": "Blank"}, {"code": "9", "product_name": "Ok"}]}"#,
        );
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].barcode, "9");
    }

    #[test]
    fn skips_malformed_entries() {
        let products = decode(
            r#"{"products": [null, 42, {"code": "1", "additives_tags": "oops"}, {"code": "2"}]}"#,
        );
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].barcode, "2");
    }

    #[test]
    fn missing_products_array_is_empty() {
        assert!(decode(r#"{"count": 0}"#).is_empty());
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = decode_search_response("yogurt", b"<html>").unwrap_err();
        assert!(matches!(err, EngineError::CatalogDecode { .. }));
        assert!(!err.is_retryable());
    }
}
