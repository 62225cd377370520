//! 포장 용량 파서 및 비교기
//!
//! 자유 형식 용량 문자열(`"500 g"`, `"1,5 L"`, `"12 x 330 ml"`)을
//! 정규화된 단위(그램, 밀리리터, 개수)로 변환하고 두 용량을 비교합니다.
//!
//! 해석 순서 (먼저 일치한 규칙 사용):
//! 1. 개수 패턴: 정수 + 개수 단어 (`6 pack`) 또는 `N x 용량` 묶음
//! 2. 숫자 + 단위: 무게 표를 먼저, 그다음 부피 표 조회
//! 3. 숫자만: 그램으로 간주
//!
//! 인식할 수 없는 문자열은 `None`입니다. 0으로 취급하지 않습니다.

use serde::{Deserialize, Serialize};

use healthswap_core::types::HealthScore;

/// 정규화 기준 단위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityUnit {
    /// 그램 (g, kg, mg 입력 포함)
    #[serde(rename = "g")]
    Gram,
    /// 밀리리터 (모든 부피 입력)
    #[serde(rename = "ml")]
    Milliliter,
    /// 온스 (무게)
    #[serde(rename = "oz")]
    Ounce,
    /// 파운드
    #[serde(rename = "lb")]
    Pound,
    /// 개수
    #[serde(rename = "count")]
    Count,
}

impl QuantityUnit {
    /// 표시용 단위 기호
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Milliliter => "ml",
            Self::Ounce => "oz",
            Self::Pound => "lb",
            Self::Count => "ct",
        }
    }
}

impl std::fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 비교 가능한 용량 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityClass {
    /// 무게 (그램 기준)
    Weight,
    /// 부피 (밀리리터 기준)
    Volume,
    /// 개수
    Count,
}

/// 파싱된 포장 용량
///
/// 호출마다 새로 만들어지며 캐싱하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    /// `unit` 기준 값
    pub value: f64,
    /// 단위
    pub unit: QuantityUnit,
    /// 그램/밀리리터/개수로 정규화된 값
    pub normalized: f64,
    /// 표시 문자열 (예: `500g`, `1.5L`, `6 ct`)
    pub display: String,
    /// 부피 여부
    pub is_volume: bool,
}

impl ParsedQuantity {
    /// 비교 가능한 분류를 반환합니다.
    pub fn class(&self) -> QuantityClass {
        if self.unit == QuantityUnit::Count {
            QuantityClass::Count
        } else if self.is_volume {
            QuantityClass::Volume
        } else {
            QuantityClass::Weight
        }
    }
}

/// 두 용량의 비교 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityComparison {
    /// `(B - A) / A × 100`을 반올림한 값
    pub diff_percent: i64,
    /// `"Same size"`, `"N% more"`, `"N% less"`
    pub description: String,
}

const COUNT_WORDS: &[&str] = &[
    "pack", "packs", "pk", "count", "ct", "piece", "pieces", "pcs", "pc", "serving", "servings",
    "bar", "bars", "bottle", "bottles", "can", "cans", "box", "boxes", "tablet", "tablets",
    "capsule", "capsules", "sachet", "sachets", "pouch", "pouches", "bag", "bags", "unit",
    "units", "stick", "sticks", "cup", "cups", "roll", "rolls", "egg", "eggs", "slice", "slices",
];

/// 무게 단위 → (기준 단위, 그램 환산 계수)
const WEIGHT_UNITS: &[(&str, QuantityUnit, f64)] = &[
    ("g", QuantityUnit::Gram, 1.0),
    ("gr", QuantityUnit::Gram, 1.0),
    ("gram", QuantityUnit::Gram, 1.0),
    ("grams", QuantityUnit::Gram, 1.0),
    ("gramme", QuantityUnit::Gram, 1.0),
    ("grammes", QuantityUnit::Gram, 1.0),
    ("kg", QuantityUnit::Gram, 1000.0),
    ("kgs", QuantityUnit::Gram, 1000.0),
    ("kilo", QuantityUnit::Gram, 1000.0),
    ("kilos", QuantityUnit::Gram, 1000.0),
    ("kilogram", QuantityUnit::Gram, 1000.0),
    ("kilograms", QuantityUnit::Gram, 1000.0),
    ("mg", QuantityUnit::Gram, 0.001),
    ("milligram", QuantityUnit::Gram, 0.001),
    ("milligrams", QuantityUnit::Gram, 0.001),
    ("oz", QuantityUnit::Ounce, 28.3495),
    ("ounce", QuantityUnit::Ounce, 28.3495),
    ("ounces", QuantityUnit::Ounce, 28.3495),
    ("lb", QuantityUnit::Pound, 453.592),
    ("lbs", QuantityUnit::Pound, 453.592),
    ("pound", QuantityUnit::Pound, 453.592),
    ("pounds", QuantityUnit::Pound, 453.592),
];

/// 부피 단위 → 밀리리터 환산 계수
const VOLUME_UNITS: &[(&str, f64)] = &[
    ("ml", 1.0),
    ("milliliter", 1.0),
    ("milliliters", 1.0),
    ("millilitre", 1.0),
    ("millilitres", 1.0),
    ("l", 1000.0),
    ("lt", 1000.0),
    ("ltr", 1000.0),
    ("liter", 1000.0),
    ("liters", 1000.0),
    ("litre", 1000.0),
    ("litres", 1000.0),
    ("cl", 10.0),
    ("centiliter", 10.0),
    ("centilitre", 10.0),
    ("dl", 100.0),
    ("deciliter", 100.0),
    ("decilitre", 100.0),
    ("fl oz", 29.5735),
    ("floz", 29.5735),
    ("fluid ounce", 29.5735),
    ("fluid ounces", 29.5735),
    ("gal", 3785.41),
    ("gallon", 3785.41),
    ("gallons", 3785.41),
    ("pt", 473.176),
    ("pint", 473.176),
    ("pints", 473.176),
    ("qt", 946.353),
    ("quart", 946.353),
    ("quarts", 946.353),
];

/// 용량 문자열을 파싱합니다.
///
/// 인식하지 못하면 `None`을 반환하고 실패 카운터를 증가시킵니다.
pub fn parse_quantity(input: &str) -> Option<ParsedQuantity> {
    let parsed = parse_inner(input);
    if parsed.is_none() && !input.trim().is_empty() {
        metrics::counter!(healthswap_core::metrics::QUANTITY_PARSE_FAILURES_TOTAL).increment(1);
        tracing::debug!(input = input, "unrecognized quantity string");
    }
    parsed
}

fn parse_inner(input: &str) -> Option<ParsedQuantity> {
    let text = input.trim().to_lowercase();
    let (number, rest) = split_leading_number(&text)?;
    let rest = rest.trim_start();

    if let Some(parsed) = parse_count(number, rest) {
        return Some(parsed);
    }

    let value = parse_decimal(number)?;
    if value <= 0.0 {
        return None;
    }

    if rest.is_empty() {
        return Some(build_measure(value, QuantityUnit::Gram, 1.0, false));
    }

    // 단위는 숫자 바로 뒤에 와야 한다 ("500 g / 1.1 lb"에서 lb를 잡지 않도록)
    if !rest.starts_with(|c: char| c.is_alphabetic()) {
        return None;
    }

    let words: Vec<&str> = rest
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .take(2)
        .collect();

    let mut candidates = Vec::with_capacity(2);
    if words.len() == 2 {
        candidates.push(format!("{} {}", words[0], words[1]));
    }
    if let Some(first) = words.first() {
        candidates.push((*first).to_owned());
    }

    candidates
        .iter()
        .find_map(|token| lookup_unit(token))
        .map(|(unit, factor, is_volume)| build_measure(value, unit, factor, is_volume))
        .filter(|q| q.normalized.is_finite())
}

/// 선행 숫자 토큰과 나머지 문자열을 분리합니다.
fn split_leading_number(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(text.len());
    let number = text[..end].trim_end_matches(['.', ',']);
    Some((number, &text[end..]))
}

fn parse_decimal(number: &str) -> Option<f64> {
    let value: f64 = number.replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

fn parse_count(number: &str, rest: &str) -> Option<ParsedQuantity> {
    if number.contains(['.', ',']) {
        return None;
    }
    let count: u32 = number.parse().ok()?;
    if count == 0 {
        return None;
    }

    let is_multipack = rest
        .strip_prefix(['x', '×'])
        .is_some_and(|after| after.trim_start().starts_with(|c: char| c.is_ascii_digit()));

    let first_word: String = rest.chars().take_while(|c| c.is_alphabetic()).collect();
    let is_count_word = COUNT_WORDS.contains(&first_word.as_str());

    if !(is_multipack || is_count_word) {
        return None;
    }

    let value = f64::from(count);
    Some(ParsedQuantity {
        value,
        unit: QuantityUnit::Count,
        normalized: value,
        display: format!("{count} ct"),
        is_volume: false,
    })
}

fn lookup_unit(token: &str) -> Option<(QuantityUnit, f64, bool)> {
    WEIGHT_UNITS
        .iter()
        .find(|(name, _, _)| *name == token)
        .map(|(_, unit, factor)| (*unit, *factor, false))
        .or_else(|| {
            VOLUME_UNITS
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, factor)| (QuantityUnit::Milliliter, *factor, true))
        })
}

fn build_measure(raw: f64, unit: QuantityUnit, factor: f64, is_volume: bool) -> ParsedQuantity {
    let normalized = raw * factor;
    // 미터법 입력은 기준 단위 값으로, 온스/파운드는 입력 값 그대로 보관
    let value = match unit {
        QuantityUnit::Gram | QuantityUnit::Milliliter => normalized,
        _ => raw,
    };

    // 단위 전환은 표시용으로 반올림한 값 기준
    let display = if round_tenth(normalized) >= 1000.0 {
        let big_unit = if is_volume { "L" } else { "kg" };
        format!("{}{big_unit}", format_amount(normalized / 1000.0))
    } else {
        format!("{}{}", format_amount(value), unit.symbol())
    };

    ParsedQuantity {
        value,
        unit,
        normalized,
        display,
        is_volume,
    }
}

fn round_tenth(amount: f64) -> f64 {
    (amount * 10.0).round() / 10.0
}

fn format_amount(amount: f64) -> String {
    let rounded = round_tenth(amount);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// 두 용량을 비교합니다 (`b`가 `a`보다 얼마나 큰지).
///
/// 분류가 다르면(무게 대 부피, 개수 대 무게) `None`입니다.
/// `|diff| < tolerance_percent`이면 `"Same size"`입니다.
pub fn compare_quantities(
    a: &ParsedQuantity,
    b: &ParsedQuantity,
    tolerance_percent: f64,
) -> Option<QuantityComparison> {
    if a.class() != b.class() || a.normalized <= 0.0 {
        return None;
    }

    let ratio = (b.normalized - a.normalized) / a.normalized * 100.0;
    if !ratio.is_finite() {
        return None;
    }
    // 반올림 후 i64 범위 안으로 제한
    let diff_percent = ratio.round().clamp(-1.0e15, 1.0e15) as i64;

    let description = if (diff_percent.unsigned_abs() as f64) < tolerance_percent {
        "Same size".to_owned()
    } else if diff_percent > 0 {
        format!("{diff_percent}% more")
    } else {
        format!("{}% less", diff_percent.unsigned_abs())
    };

    Some(QuantityComparison {
        diff_percent,
        description,
    })
}

/// 대체품의 가성비 배지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueBadge {
    /// 대체품 중 최고 점수이며 원본보다 10점 이상 높음
    BestQuality,
    /// 용량 20% 이상 많고 점수가 원본 -5점 이내이거나 더 높음
    BetterValue,
    /// 용량 30% 이상 많고 점수가 원본 -15점 이내
    BudgetPick,
}

impl ValueBadge {
    /// 직렬화 이름과 같은 레이블
    pub fn label(&self) -> &'static str {
        match self {
            Self::BestQuality => "best-quality",
            Self::BetterValue => "better-value",
            Self::BudgetPick => "budget-pick",
        }
    }
}

impl std::fmt::Display for ValueBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 우선순위에 따라 최대 하나의 배지를 결정합니다.
///
/// `quantity_diff_percent`는 원본 대비 후보 용량 차이(%)이며,
/// 비교할 수 없으면 `None`입니다.
pub fn value_badge(
    candidate: HealthScore,
    original: HealthScore,
    is_top_score: bool,
    quantity_diff_percent: Option<i64>,
) -> Option<ValueBadge> {
    let gain = candidate.diff(original);

    if is_top_score && gain >= 10 {
        return Some(ValueBadge::BestQuality);
    }

    let diff = quantity_diff_percent?;
    if diff >= 20 && gain >= -5 {
        Some(ValueBadge::BetterValue)
    } else if diff >= 30 && gain >= -15 {
        Some(ValueBadge::BudgetPick)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParsedQuantity {
        parse_quantity(s).unwrap_or_else(|| panic!("failed to parse {s:?}"))
    }

    #[test]
    fn parses_plain_grams() {
        let q = parse("500g");
        assert_eq!(q.value, 500.0);
        assert_eq!(q.unit, QuantityUnit::Gram);
        assert_eq!(q.normalized, 500.0);
        assert_eq!(q.display, "500g");
        assert!(!q.is_volume);
    }

    #[test]
    fn parses_litres_with_decimal() {
        let q = parse("1.5L");
        assert_eq!(q.normalized, 1500.0);
        assert_eq!(q.display, "1.5L");
        assert!(q.is_volume);
        assert_eq!(q.unit, QuantityUnit::Milliliter);
    }

    #[test]
    fn parses_ounces() {
        let q = parse("12 oz");
        assert!((q.normalized - 340.194).abs() < 0.01);
        assert_eq!(q.unit, QuantityUnit::Ounce);
        assert_eq!(q.value, 12.0);
        assert_eq!(q.display, "12oz");
        assert!(!q.is_volume);
    }

    #[test]
    fn parses_count_pack() {
        let q = parse("6 pack");
        assert_eq!(q.value, 6.0);
        assert_eq!(q.unit, QuantityUnit::Count);
        assert_eq!(q.normalized, 6.0);
        assert_eq!(q.display, "6 ct");
    }

    #[test]
    fn parses_multipack_as_count() {
        let q = parse("12 x 330 ml");
        assert_eq!(q.unit, QuantityUnit::Count);
        assert_eq!(q.normalized, 12.0);

        let q = parse("4x125g");
        assert_eq!(q.unit, QuantityUnit::Count);
        assert_eq!(q.value, 4.0);
    }

    #[test]
    fn parses_comma_decimal() {
        let q = parse("1,5 l");
        assert_eq!(q.normalized, 1500.0);
        assert_eq!(q.display, "1.5L");
    }

    #[test]
    fn parses_fluid_ounces_as_volume() {
        let q = parse("16 fl oz bottle");
        assert!(q.is_volume);
        assert!((q.normalized - 473.176).abs() < 0.01);

        let q = parse("8 fl. oz");
        assert!(q.is_volume);
    }

    #[test]
    fn weight_table_wins_over_volume_for_plain_oz() {
        let q = parse("12 oz can");
        assert!(!q.is_volume);
        assert_eq!(q.unit, QuantityUnit::Ounce);
    }

    #[test]
    fn large_weights_render_as_kg() {
        assert_eq!(parse("2 kg").display, "2kg");
        assert_eq!(parse("1300 g").display, "1.3kg");
        assert_eq!(parse("3 lb").display, "1.4kg");
    }

    #[test]
    fn display_rounds_before_choosing_unit() {
        assert_eq!(parse("999.96 g").display, "1kg");
        assert_eq!(parse("999.99 ml").display, "1L");
        assert_eq!(parse("999.94 g").display, "999.9g");
        assert_eq!(parse("1.999 l").display, "2L");
        assert_eq!(parse("12.98 oz").display, "13oz");
    }

    #[test]
    fn other_volume_units_convert() {
        assert_eq!(parse("75 cl").normalized, 750.0);
        assert_eq!(parse("5 dl").normalized, 500.0);
        assert!((parse("1 gal").normalized - 3785.41).abs() < 0.001);
        assert!((parse("1 pt").normalized - 473.176).abs() < 0.001);
        assert!((parse("1 qt").normalized - 946.353).abs() < 0.001);
    }

    #[test]
    fn milligrams_convert_to_grams() {
        let q = parse("500 mg");
        assert!((q.normalized - 0.5).abs() < 1e-9);
        assert_eq!(q.unit, QuantityUnit::Gram);
    }

    #[test]
    fn bare_number_is_grams() {
        let q = parse("250");
        assert_eq!(q.unit, QuantityUnit::Gram);
        assert_eq!(q.normalized, 250.0);
        assert_eq!(q.display, "250g");
    }

    #[test]
    fn unrecognized_strings_return_none() {
        assert!(parse_quantity("").is_none());
        assert!(parse_quantity("family size").is_none());
        assert!(parse_quantity("500 furlongs").is_none());
        assert!(parse_quantity("0 g").is_none());
        assert!(parse_quantity("500 (approx)").is_none());
    }

    #[test]
    fn unit_must_follow_number() {
        // 첫 단위가 인식되지 않으면 뒤쪽 단위로 넘어가지 않음
        assert!(parse_quantity("500 / 1.1 lb").is_none());
        assert_eq!(parse("500 g / 1.1 lb").normalized, 500.0);
    }

    #[test]
    fn compare_more() {
        let a = parse("500g");
        let b = parse("600g");
        let cmp = compare_quantities(&a, &b, 5.0).unwrap();
        assert_eq!(cmp.diff_percent, 20);
        assert_eq!(cmp.description, "20% more");
    }

    #[test]
    fn compare_less() {
        let a = parse("1 kg");
        let b = parse("750 g");
        let cmp = compare_quantities(&a, &b, 5.0).unwrap();
        assert_eq!(cmp.diff_percent, -25);
        assert_eq!(cmp.description, "25% less");
    }

    #[test]
    fn compare_within_tolerance_is_same_size() {
        let a = parse("500g");
        let b = parse("510g");
        let cmp = compare_quantities(&a, &b, 5.0).unwrap();
        assert_eq!(cmp.diff_percent, 2);
        assert_eq!(cmp.description, "Same size");
    }

    #[test]
    fn tolerance_is_configurable() {
        let a = parse("500g");
        let b = parse("540g");
        assert_eq!(compare_quantities(&a, &b, 5.0).unwrap().description, "8% more");
        assert_eq!(compare_quantities(&a, &b, 10.0).unwrap().description, "Same size");
    }

    #[test]
    fn compare_weight_to_volume_is_none() {
        let a = parse("500g");
        let b = parse("500ml");
        assert!(compare_quantities(&a, &b, 5.0).is_none());
    }

    #[test]
    fn compare_count_only_with_count() {
        let pack = parse("6 pack");
        let grams = parse("500g");
        let bigger_pack = parse("12 pack");
        assert!(compare_quantities(&pack, &grams, 5.0).is_none());
        assert_eq!(
            compare_quantities(&pack, &bigger_pack, 5.0).unwrap().diff_percent,
            100
        );
    }

    #[test]
    fn compare_ounces_with_grams() {
        let a = parse("16 oz");
        let b = parse("1 lb");
        let cmp = compare_quantities(&a, &b, 5.0).unwrap();
        assert_eq!(cmp.description, "Same size");
    }

    #[test]
    fn badge_best_quality_requires_top_and_ten_points() {
        let original = HealthScore::clamped(50);
        assert_eq!(
            value_badge(HealthScore::clamped(60), original, true, None),
            Some(ValueBadge::BestQuality)
        );
        assert_eq!(value_badge(HealthScore::clamped(59), original, true, None), None);
        assert_eq!(value_badge(HealthScore::clamped(70), original, false, None), None);
    }

    #[test]
    fn badge_better_value_then_budget_pick() {
        let original = HealthScore::clamped(50);
        assert_eq!(
            value_badge(HealthScore::clamped(55), original, false, Some(20)),
            Some(ValueBadge::BetterValue)
        );
        assert_eq!(
            value_badge(HealthScore::clamped(40), original, false, Some(30)),
            Some(ValueBadge::BudgetPick)
        );
        assert_eq!(
            value_badge(HealthScore::clamped(40), original, false, Some(25)),
            None
        );
        assert_eq!(
            value_badge(HealthScore::clamped(30), original, false, Some(50)),
            None
        );
    }

    #[test]
    fn badge_serializes_kebab_case() {
        let json = serde_json::to_string(&ValueBadge::BestQuality).unwrap();
        assert_eq!(json, "\"best-quality\"");
        assert_eq!(ValueBadge::BudgetPick.to_string(), "budget-pick");
    }
}
