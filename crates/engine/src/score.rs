//! 건강 점수 계산기 -- 영양/가공 메타데이터를 `[0, 100]` 점수로 변환
//!
//! [`health_score`]는 점수가 필요한 모든 곳(비교, 대체품 순위, 추세 분석)에서 쓰이는
//! 유일한 점수 함수입니다. 호출자는 자신이 가진 필드만 채우며,
//! 값이 없는 필드는 정확히 0을 기여합니다.
//!
//! # 가중치
//!
//! | 항목 | 기여 |
//! |------|------|
//! | 기본값 | 50 |
//! | Nutri-Score | A +25, B +15, C 0, D -15, E -25 |
//! | NOVA | 1 +20, 2 +10, 3 -10, 4 -20 |
//! | 회피 성분 | 개당 -10, 최대 -30 |
//! | 첨가물 | 개당 -3, 최대 -15 |
//! | 힌트 | healthy +10, unhealthy -10 |

use healthswap_core::types::{HealthRating, HealthScore, NovaGroup, NutriScoreGrade, ProductHealthProfile};

/// 기본 점수
pub const BASE_SCORE: i32 = 50;

const FLAG_PENALTY_PER_ITEM: i32 = 10;
const FLAG_PENALTY_CAP: i32 = 30;
const ADDITIVE_PENALTY_PER_ITEM: i32 = 3;
const ADDITIVE_PENALTY_CAP: i32 = 15;

/// 프로필의 건강 점수를 계산합니다.
///
/// 순수 함수이며 I/O가 없습니다. 결과는 항상 `[0, 100]` 범위입니다.
pub fn health_score(profile: &ProductHealthProfile) -> HealthScore {
    let raw = BASE_SCORE
        + nutriscore_points(profile.nutriscore_grade)
        + nova_points(profile.nova_group)
        - flagged_penalty(profile.flagged_ingredient_count)
        - additive_penalty(profile.additive_count)
        + hint_points(profile.health_rating_hint);

    HealthScore::clamped(raw)
}

/// Nutri-Score 기여 점수 (없으면 0)
pub fn nutriscore_points(grade: Option<NutriScoreGrade>) -> i32 {
    match grade {
        Some(NutriScoreGrade::A) => 25,
        Some(NutriScoreGrade::B) => 15,
        Some(NutriScoreGrade::C) | None => 0,
        Some(NutriScoreGrade::D) => -15,
        Some(NutriScoreGrade::E) => -25,
    }
}

/// NOVA 기여 점수 (없으면 0)
pub fn nova_points(group: Option<NovaGroup>) -> i32 {
    match group {
        Some(NovaGroup::Unprocessed) => 20,
        Some(NovaGroup::CulinaryIngredient) => 10,
        Some(NovaGroup::Processed) => -10,
        Some(NovaGroup::UltraProcessed) => -20,
        None => 0,
    }
}

/// 회피 성분 감점 (양수, 최대 30)
pub fn flagged_penalty(count: u32) -> i32 {
    capped_penalty(count, FLAG_PENALTY_PER_ITEM, FLAG_PENALTY_CAP)
}

/// 첨가물 감점 (양수, 최대 15)
pub fn additive_penalty(count: u32) -> i32 {
    capped_penalty(count, ADDITIVE_PENALTY_PER_ITEM, ADDITIVE_PENALTY_CAP)
}

/// 힌트 기여 점수
pub fn hint_points(hint: Option<HealthRating>) -> i32 {
    match hint {
        Some(HealthRating::Healthy) => 10,
        Some(HealthRating::Unhealthy) => -10,
        Some(HealthRating::Moderate | HealthRating::Unknown) | None => 0,
    }
}

fn capped_penalty(count: u32, per_item: i32, cap: i32) -> i32 {
    // 상한을 넘는 개수는 의미가 없으므로 변환 전에 잘라낸다
    let items = i32::try_from(count.min(100)).unwrap_or(100);
    (items * per_item).min(cap)
}
