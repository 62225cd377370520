#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use healthswap_core::types::{
    HealthRating, HealthScore, NovaGroup, NutriScoreGrade, ProductHealthProfile,
};
use healthswap_engine::health_score;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    grade: Option<u8>,
    nova: Option<u8>,
    flagged: u32,
    additives: u32,
    hint: Option<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let grades = [
        NutriScoreGrade::A,
        NutriScoreGrade::B,
        NutriScoreGrade::C,
        NutriScoreGrade::D,
        NutriScoreGrade::E,
    ];
    let hints = [
        HealthRating::Healthy,
        HealthRating::Moderate,
        HealthRating::Unhealthy,
        HealthRating::Unknown,
    ];

    let profile = ProductHealthProfile {
        nutriscore_grade: input.grade.map(|g| grades[usize::from(g) % grades.len()]),
        nova_group: input.nova.and_then(|n| NovaGroup::from_number(n % 4 + 1)),
        flagged_ingredient_count: input.flagged,
        additive_count: input.additives,
        health_rating_hint: input.hint.map(|h| hints[usize::from(h) % hints.len()]),
    };

    let score = health_score(&profile);
    assert!(score >= HealthScore::MIN && score <= HealthScore::MAX);
});
