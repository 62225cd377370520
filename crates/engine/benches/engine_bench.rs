//! 엔진 벤치마크
//!
//! 점수 계산, 검색어 추출, 용량 파싱, 후보 순위 성능을 측정합니다.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use healthswap_core::types::{NovaGroup, NutriScoreGrade, ProductHealthProfile};
use healthswap_engine::{
    AlternativeRanker, CandidateProduct, OriginalProduct, extract_search_terms, health_score,
    parse_quantity,
};

const GRADES: [NutriScoreGrade; 5] = [
    NutriScoreGrade::A,
    NutriScoreGrade::B,
    NutriScoreGrade::C,
    NutriScoreGrade::D,
    NutriScoreGrade::E,
];

/// 후보 풀 생성 (count개, 일부 바코드 중복)
fn generate_pool(count: usize) -> Vec<CandidateProduct> {
    (0..count)
        .map(|i| CandidateProduct {
            barcode: format!("{:08}", i % (count * 9 / 10).max(1)),
            name: format!("Candidate {i}"),
            nutriscore_grade: Some(GRADES[i % GRADES.len()]),
            nova_group: NovaGroup::from_number(u8::try_from(i % 4 + 1).unwrap_or(4)),
            additive_count: u32::try_from(i % 7).unwrap_or(0),
            quantity: Some(format!("{} g", 100 + i % 900)),
            ..Default::default()
        })
        .collect()
}

fn bench_health_score(c: &mut Criterion) {
    let profile = ProductHealthProfile {
        nutriscore_grade: Some(NutriScoreGrade::B),
        nova_group: Some(NovaGroup::Processed),
        flagged_ingredient_count: 2,
        additive_count: 4,
        health_rating_hint: None,
    };

    let mut group = c.benchmark_group("health_score");
    group.throughput(Throughput::Elements(1));
    group.bench_function("full_profile", |b| {
        b.iter(|| health_score(black_box(&profile)))
    });
    group.finish();
}

fn bench_search_terms(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_terms");
    group.throughput(Throughput::Elements(1));
    group.bench_function("name_rule_hit", |b| {
        b.iter(|| extract_search_terms(black_box("Honey Nut Granola Bar"), None))
    });
    group.bench_function("category_fallback", |b| {
        b.iter(|| {
            extract_search_terms(
                black_box("Adult Kibble Formula"),
                black_box(Some("en:pet-food, en:dog-food")),
            )
        })
    });
    group.bench_function("significant_words_fallback", |b| {
        b.iter(|| extract_search_terms(black_box("Organic Quinoa Medley"), None))
    });
    group.finish();
}

fn bench_quantity_parsing(c: &mut Criterion) {
    let inputs = ["500 g", "1.5 kg", "12 fl oz", "6 x 330 ml", "2 lb", "24 count"];

    let mut group = c.benchmark_group("quantity_parsing");
    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("mixed_units", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(parse_quantity(black_box(input)));
            }
        })
    });
    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let original = OriginalProduct::new(
        "original".to_owned(),
        ProductHealthProfile {
            nutriscore_grade: Some(NutriScoreGrade::D),
            nova_group: Some(NovaGroup::UltraProcessed),
            ..Default::default()
        },
        parse_quantity("500 g"),
    );
    let ranker = AlternativeRanker::new(5, true, 5.0);
    let pool_72 = generate_pool(72);
    let pool_1000 = generate_pool(1000);

    let mut group = c.benchmark_group("ranking");

    group.throughput(Throughput::Elements(72));
    group.bench_function("pool_72", |b| {
        b.iter(|| ranker.rank(black_box(&original), black_box(pool_72.clone())))
    });

    group.throughput(Throughput::Elements(1000));
    group.bench_function("pool_1000", |b| {
        b.iter(|| ranker.rank(black_box(&original), black_box(pool_1000.clone())))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_health_score,
    bench_search_terms,
    bench_quantity_parsing,
    bench_ranking
);
criterion_main!(benches);
