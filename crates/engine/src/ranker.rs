//! 대체품 필터 및 순위
//!
//! 병합된 후보 풀에서 원본보다 **엄격하게** 건강한 제품만 골라 순위를 매깁니다.
//!
//! 처리 순서 (순서 변경 불가):
//! 1. 바코드 기준 중복 제거, 원본 바코드 제외
//! 2. 표시 이름이 없는 후보 제거
//! 3. 건강 점수 계산
//! 4. 점수가 원본 이하인 후보 제거 (동점도 제외)
//! 5. 개선 사유 생성 (최대 2개)
//! 6. 점수 내림차순, 동점은 바코드 오름차순
//! 7. `max_results`개로 자르기
//!
//! 가성비 배지는 잘린 결과에 대해 마지막에 부착합니다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use healthswap_core::types::{HealthScore, ProductHealthProfile};

use crate::catalog::CandidateProduct;
use crate::quantity::{ParsedQuantity, ValueBadge, compare_quantities, parse_quantity, value_badge};
use crate::score::health_score;

/// 최대 개선 사유 수
pub const MAX_REASONS: usize = 2;

/// 개선 사유가 하나도 없을 때의 기본 사유
pub const DEFAULT_REASON: &str = "Healthier option";

/// 순위 기준이 되는 원본 제품
#[derive(Debug, Clone)]
pub struct OriginalProduct {
    /// 원본 바코드 (결과에서 제외)
    pub barcode: String,
    /// 원본 건강 프로필
    pub profile: ProductHealthProfile,
    /// 원본 건강 점수
    pub score: HealthScore,
    /// 원본 포장 용량
    pub quantity: Option<ParsedQuantity>,
}

impl OriginalProduct {
    /// 프로필에서 점수를 계산해 원본을 만듭니다.
    pub fn new(
        barcode: impl Into<String>,
        profile: ProductHealthProfile,
        quantity: Option<ParsedQuantity>,
    ) -> Self {
        let score = health_score(&profile);
        Self {
            barcode: barcode.into(),
            profile,
            score,
            quantity,
        }
    }
}

/// 순위가 매겨진 대체품
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeResult {
    /// 후보 제품
    pub candidate: CandidateProduct,
    /// 후보 건강 점수
    pub health_score: HealthScore,
    /// 개선 사유 (우선순위 순, 최대 2개)
    pub improvement_reasons: Vec<String>,
    /// 순위 (1부터)
    pub rank: usize,
    /// 가성비 배지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<ValueBadge>,
}

/// 대체품 순위기
#[derive(Debug, Clone)]
pub struct AlternativeRanker {
    max_results: usize,
    value_badges: bool,
    quantity_tolerance_percent: f64,
}

impl AlternativeRanker {
    /// 새 순위기를 생성합니다.
    pub fn new(max_results: usize, value_badges: bool, quantity_tolerance_percent: f64) -> Self {
        Self {
            max_results,
            value_badges,
            quantity_tolerance_percent,
        }
    }

    /// 후보 풀을 필터링하고 순위를 매깁니다.
    pub fn rank(
        &self,
        original: &OriginalProduct,
        candidates: Vec<CandidateProduct>,
    ) -> Vec<AlternativeResult> {
        let pool_size = candidates.len();

        // 1. dedupe + exclude original
        let original_barcode = original.barcode.trim();
        let mut seen = HashSet::new();
        let unique: Vec<CandidateProduct> = candidates
            .into_iter()
            .filter(|c| {
                let barcode = c.barcode.trim();
                !barcode.is_empty()
                    && barcode != original_barcode
                    && seen.insert(barcode.to_owned())
            })
            .collect();
        let unique_count = unique.len();

        // 2. display name
        // 3. score
        // 4. strict improvement
        let mut improved: Vec<(CandidateProduct, HealthScore)> = unique
            .into_iter()
            .filter(CandidateProduct::has_display_name)
            .map(|c| {
                let score = health_score(&c.to_profile());
                (c, score)
            })
            .filter(|(_, score)| *score > original.score)
            .collect();

        debug!(
            pool_size = pool_size,
            unique = unique_count,
            improved = improved.len(),
            original_score = original.score.value(),
            "filtered candidate pool"
        );

        // 6. score desc, barcode asc
        improved.sort_by(|(a, sa), (b, sb)| sb.cmp(sa).then_with(|| a.barcode.cmp(&b.barcode)));

        // 7. truncate
        improved.truncate(self.max_results);

        let top_score = improved.first().map(|(_, s)| *s);
        improved
            .into_iter()
            .enumerate()
            .map(|(index, (candidate, score))| {
                // 5. reasons
                let improvement_reasons = improvement_reasons(&original.profile, &candidate);
                let badge = if self.value_badges {
                    self.badge_for(original, &candidate, score, top_score == Some(score))
                } else {
                    None
                };
                AlternativeResult {
                    candidate,
                    health_score: score,
                    improvement_reasons,
                    rank: index + 1,
                    badge,
                }
            })
            .collect()
    }

    fn badge_for(
        &self,
        original: &OriginalProduct,
        candidate: &CandidateProduct,
        score: HealthScore,
        is_top: bool,
    ) -> Option<ValueBadge> {
        let quantity_diff = original.quantity.as_ref().and_then(|orig| {
            let cand = candidate.quantity.as_deref().and_then(parse_quantity)?;
            compare_quantities(orig, &cand, self.quantity_tolerance_percent)
                .map(|c| c.diff_percent)
        });
        value_badge(score, original.score, is_top, quantity_diff)
    }
}

/// 원본 대비 개선 사유를 우선순위대로 만듭니다 (최대 2개).
pub fn improvement_reasons(
    original: &ProductHealthProfile,
    candidate: &CandidateProduct,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(MAX_REASONS);

    if let (Some(cand), Some(orig)) = (candidate.nutriscore_grade, original.nutriscore_grade)
        && cand.rank() < orig.rank()
    {
        reasons.push(format!("Better Nutri-Score ({cand} vs {orig})"));
    }

    if let (Some(cand), Some(orig)) = (candidate.nova_group, original.nova_group)
        && cand.number() < orig.number()
    {
        reasons.push(format!(
            "Less processed (NOVA {} vs {})",
            cand.number(),
            orig.number()
        ));
    }

    if candidate.additive_count == 0 {
        reasons.push("No additives".to_owned());
    } else if candidate.additive_count <= 2 {
        reasons.push("Fewer additives".to_owned());
    }

    if reasons.is_empty() {
        reasons.push(DEFAULT_REASON.to_owned());
    }
    reasons.truncate(MAX_REASONS);
    reasons
}
