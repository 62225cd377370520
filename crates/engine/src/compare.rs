//! 두 제품 비교 -- 점수 쌍, 승자 판정, 항목별 차이
//!
//! 건강 관련 항목(Nutri-Score, NOVA, 회피 성분, 첨가물)은 **점수 기여도 차이**를
//! 전체 판정과 같은 무승부 점수 차로 비교합니다. 그래서 세부 항목이 전체 판정과
//! 모순되지 않습니다. 예를 들어 첨가물 1개 차이(3점)는 기본 설정에서 `Equal`입니다.
//!
//! 알레르기 유발 성분 수와 용량은 점수와 무관하므로 각자의 기준으로 비교하며,
//! 전체 판정과 다를 수 있습니다. 모든 결과는 A 관점입니다.

use metrics::counter;
use serde::{Deserialize, Serialize};

use healthswap_core::metrics as m;
use healthswap_core::types::{HealthScore, ProductHealthProfile};

use crate::quantity::{ParsedQuantity, QuantityComparison, compare_quantities};
use crate::score::{additive_penalty, flagged_penalty, health_score, nova_points, nutriscore_points};

/// 비교 대상 한쪽
#[derive(Debug, Clone, Default)]
pub struct ComparisonInput {
    /// 건강 프로필
    pub profile: ProductHealthProfile,
    /// 알레르기 유발 성분 수
    pub allergen_count: u32,
    /// 포장 용량
    pub quantity: Option<ParsedQuantity>,
}

/// 승자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// A가 무승부 점수 차 이상으로 높음
    A,
    /// B가 무승부 점수 차 이상으로 높음
    B,
    /// 점수 차가 무승부 점수 차 미만
    Tie,
    /// 한쪽이라도 점수 데이터가 없음
    Unknown,
}

impl Winner {
    /// 메트릭 레이블 값
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::Tie => "tie",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 비교 항목
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Nutri-Score 등급
    NutriScore,
    /// NOVA 그룹
    Nova,
    /// 회피 성분 수
    FlaggedIngredients,
    /// 첨가물 수
    Additives,
    /// 알레르기 유발 성분 수
    Allergens,
    /// 정규화된 용량
    Quantity,
}

impl Attribute {
    /// 표시 이름
    pub fn label(&self) -> &'static str {
        match self {
            Self::NutriScore => "Nutri-Score",
            Self::Nova => "NOVA group",
            Self::FlaggedIngredients => "Flagged ingredients",
            Self::Additives => "Additives",
            Self::Allergens => "Allergens",
            Self::Quantity => "Quantity",
        }
    }
}

/// A 관점의 항목 비교 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaOutcome {
    /// A가 더 좋음
    Better,
    /// A가 더 나쁨
    Worse,
    /// 차이가 허용 오차 미만
    Equal,
    /// 한쪽 값이 없거나 비교 불가
    Unknown,
}

/// 항목별 차이
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDelta {
    /// 항목
    pub attribute: Attribute,
    /// A 관점 결과
    pub outcome: DeltaOutcome,
    /// A 값 (표시용)
    pub value_a: Option<String>,
    /// B 값 (표시용)
    pub value_b: Option<String>,
}

/// 비교 판정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    /// A 점수
    pub score_a: HealthScore,
    /// B 점수
    pub score_b: HealthScore,
    /// 승자
    pub winner: Winner,
    /// 점수 차 절댓값
    pub margin: u8,
    /// 항목별 차이
    pub deltas: Vec<AttributeDelta>,
    /// 용량 비교 (분류가 다르거나 값이 없으면 `None`)
    pub quantity: Option<QuantityComparison>,
}

/// 두 제품 비교기
#[derive(Debug, Clone, Copy)]
pub struct ProductComparator {
    score_tie_margin: u8,
    quantity_tolerance_percent: f64,
}

impl ProductComparator {
    /// 무승부 점수 차와 용량 허용 오차로 비교기를 생성합니다.
    pub fn new(score_tie_margin: u8, quantity_tolerance_percent: f64) -> Self {
        Self {
            score_tie_margin,
            quantity_tolerance_percent,
        }
    }

    /// 두 제품을 비교합니다.
    pub fn compare(&self, a: &ComparisonInput, b: &ComparisonInput) -> ComparisonVerdict {
        let score_a = health_score(&a.profile);
        let score_b = health_score(&b.profile);
        let diff = score_a.diff(score_b);
        let margin = u8::try_from(diff.unsigned_abs()).unwrap_or(u8::MAX);
        let tie_margin = i32::from(self.score_tie_margin);

        let winner = if !a.profile.has_scoring_data() || !b.profile.has_scoring_data() {
            Winner::Unknown
        } else if diff > 0 && diff >= tie_margin {
            Winner::A
        } else if diff < 0 && -diff >= tie_margin {
            Winner::B
        } else {
            Winner::Tie
        };

        let quantity = match (&a.quantity, &b.quantity) {
            (Some(qa), Some(qb)) => compare_quantities(qa, qb, self.quantity_tolerance_percent),
            _ => None,
        };

        let deltas = vec![
            self.health_delta(
                Attribute::NutriScore,
                a.profile.nutriscore_grade.map(|g| nutriscore_points(Some(g))),
                b.profile.nutriscore_grade.map(|g| nutriscore_points(Some(g))),
                a.profile.nutriscore_grade.map(|g| g.to_string()),
                b.profile.nutriscore_grade.map(|g| g.to_string()),
            ),
            self.health_delta(
                Attribute::Nova,
                a.profile.nova_group.map(|g| nova_points(Some(g))),
                b.profile.nova_group.map(|g| nova_points(Some(g))),
                a.profile.nova_group.map(|g| g.number().to_string()),
                b.profile.nova_group.map(|g| g.number().to_string()),
            ),
            self.health_delta(
                Attribute::FlaggedIngredients,
                Some(-flagged_penalty(a.profile.flagged_ingredient_count)),
                Some(-flagged_penalty(b.profile.flagged_ingredient_count)),
                Some(a.profile.flagged_ingredient_count.to_string()),
                Some(b.profile.flagged_ingredient_count.to_string()),
            ),
            self.health_delta(
                Attribute::Additives,
                Some(-additive_penalty(a.profile.additive_count)),
                Some(-additive_penalty(b.profile.additive_count)),
                Some(a.profile.additive_count.to_string()),
                Some(b.profile.additive_count.to_string()),
            ),
            allergen_delta(a.allergen_count, b.allergen_count),
            quantity_delta(a, b, quantity.as_ref()),
        ];

        counter!(m::COMPARISONS_TOTAL, m::LABEL_WINNER => winner.as_str()).increment(1);

        ComparisonVerdict {
            score_a,
            score_b,
            winner,
            margin,
            deltas,
            quantity,
        }
    }

    /// 점수 기여도 차이를 무승부 점수 차로 판정합니다.
    fn health_delta(
        &self,
        attribute: Attribute,
        points_a: Option<i32>,
        points_b: Option<i32>,
        value_a: Option<String>,
        value_b: Option<String>,
    ) -> AttributeDelta {
        let outcome = match (points_a, points_b) {
            (Some(pa), Some(pb)) => {
                let diff = pa - pb;
                if diff == 0 || diff.abs() < i32::from(self.score_tie_margin) {
                    DeltaOutcome::Equal
                } else if diff > 0 {
                    DeltaOutcome::Better
                } else {
                    DeltaOutcome::Worse
                }
            }
            _ => DeltaOutcome::Unknown,
        };
        AttributeDelta {
            attribute,
            outcome,
            value_a,
            value_b,
        }
    }
}

fn allergen_delta(a: u32, b: u32) -> AttributeDelta {
    let outcome = match a.cmp(&b) {
        std::cmp::Ordering::Equal => DeltaOutcome::Equal,
        std::cmp::Ordering::Less => DeltaOutcome::Better,
        std::cmp::Ordering::Greater => DeltaOutcome::Worse,
    };
    AttributeDelta {
        attribute: Attribute::Allergens,
        outcome,
        value_a: Some(a.to_string()),
        value_b: Some(b.to_string()),
    }
}

/// 용량이 많을수록 A에 유리합니다. `diff`는 B 기준이므로 부호가 반대입니다.
fn quantity_delta(
    a: &ComparisonInput,
    b: &ComparisonInput,
    comparison: Option<&QuantityComparison>,
) -> AttributeDelta {
    let outcome = match comparison {
        Some(c) if c.description == "Same size" => DeltaOutcome::Equal,
        Some(c) if c.diff_percent < 0 => DeltaOutcome::Better,
        Some(_) => DeltaOutcome::Worse,
        None => DeltaOutcome::Unknown,
    };
    AttributeDelta {
        attribute: Attribute::Quantity,
        outcome,
        value_a: a.quantity.as_ref().map(|q| q.display.clone()),
        value_b: b.quantity.as_ref().map(|q| q.display.clone()),
    }
}
