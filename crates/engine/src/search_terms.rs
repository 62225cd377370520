//! 검색어 추출기 -- 제품명/카테고리에서 카탈로그 검색어 생성
//!
//! 3단계 폴백이며, 결과가 하나라도 나온 첫 단계를 사용합니다.
//!
//! 1. 제품명을 `(패턴, 정규 검색어)` 규칙 표와 대조 (유형별로 묶여 있음)
//! 2. 카테고리 토큰을 키워드 목록과 대조
//! 3. 제품명의 처음 두 "의미 있는" 단어
//!
//! 결과는 중복 제거 후 최대 3개입니다.
//!
//! 규칙 표는 위에서 아래로 평가됩니다. 구체적인 패턴(`granola bar`)이
//! 넓은 패턴(`granola`)보다 먼저 오며, 둘은 서로를 가리지 않고 각각 일치할 수 있습니다.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// 최대 검색어 수
pub const MAX_SEARCH_TERMS: usize = 3;

/// 제품 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// 바 (그래놀라 바, 프로틴 바)
    Bars,
    /// 시리얼/아침식사
    Breakfast,
    /// 스낵
    Snacks,
    /// 유제품
    Dairy,
    /// 음료
    Drinks,
    /// 과자/디저트
    Sweets,
    /// 베이커리
    Bakery,
    /// 조리 식품
    PreparedFoods,
    /// 스프레드
    Spreads,
}

/// 컴파일된 검색어 규칙
#[derive(Debug)]
pub struct SearchTermRule {
    /// 규칙이 속한 제품 유형
    pub archetype: Archetype,
    /// 제품명에 대한 대소문자 무시 패턴
    pub pattern: Regex,
    /// 일치 시 사용할 정규 검색어
    pub term: &'static str,
}

/// 이름 규칙 원본 (유형, 패턴, 검색어). 순서가 곧 우선순위.
const NAME_RULES: &[(Archetype, &str, &str)] = &[
    // bars
    (Archetype::Bars, r"\bgranola\s+bars?\b", "granola bar"),
    (Archetype::Bars, r"\bprotein\s+bars?\b", "protein bar"),
    (Archetype::Bars, r"\b(?:cereal|breakfast)\s+bars?\b", "cereal bar"),
    (Archetype::Bars, r"\benergy\s+bars?\b", "energy bar"),
    (Archetype::Bars, r"\b(?:fruit|nut)\s+bars?\b", "fruit bar"),
    // cereals / breakfast
    (Archetype::Breakfast, r"\bgranola\b", "granola"),
    (Archetype::Breakfast, r"\bmuesli\b", "muesli"),
    (Archetype::Breakfast, r"\b(?:oatmeal|porridge|rolled\s+oats|oats)\b", "oatmeal"),
    (Archetype::Breakfast, r"\bcorn\s*flakes\b", "corn flakes"),
    (Archetype::Breakfast, r"\bcereals?\b", "cereal"),
    (Archetype::Breakfast, r"\b(?:pancakes?|waffles?)\b", "pancakes"),
    // snacks
    (Archetype::Snacks, r"\b(?:tortilla\s+chips|nachos)\b", "tortilla chips"),
    (Archetype::Snacks, r"\b(?:chips|crisps)\b", "chips"),
    (Archetype::Snacks, r"\bcrackers?\b", "crackers"),
    (Archetype::Snacks, r"\bpretzels?\b", "pretzels"),
    (Archetype::Snacks, r"\bpopcorn\b", "popcorn"),
    (Archetype::Snacks, r"\btrail\s+mix\b", "trail mix"),
    (Archetype::Snacks, r"\brice\s+cakes?\b", "rice cakes"),
    (Archetype::Snacks, r"\b(?:mixed\s+nuts|almonds|cashews|peanuts|pistachios)\b", "nuts"),
    // dairy
    (Archetype::Dairy, r"\bgreek\s+yog(?:h)?urts?\b", "greek yogurt"),
    (Archetype::Dairy, r"\byog(?:h)?urts?\b", "yogurt"),
    (Archetype::Dairy, r"\bkefir\b", "kefir"),
    (Archetype::Dairy, r"\bcheeses?\b", "cheese"),
    (Archetype::Dairy, r"\b(?:almond|oat|soy)\s+milk\b", "plant milk"),
    (Archetype::Dairy, r"\bmilk\b", "milk"),
    // drinks
    (Archetype::Drinks, r"\bsparkling\s+water\b", "sparkling water"),
    (Archetype::Drinks, r"\benergy\s+drinks?\b", "energy drink"),
    (Archetype::Drinks, r"\bsports?\s+drinks?\b", "sports drink"),
    (Archetype::Drinks, r"\b(?:soda|cola|soft\s+drinks?)\b", "soda"),
    (Archetype::Drinks, r"\bjuices?\b", "juice"),
    (Archetype::Drinks, r"\bsmoothies?\b", "smoothie"),
    (Archetype::Drinks, r"\biced\s+tea\b", "iced tea"),
    (Archetype::Drinks, r"\bcoffee\b", "coffee"),
    // sweets
    (Archetype::Sweets, r"\bchocolate\s+bars?\b", "chocolate bar"),
    (Archetype::Sweets, r"\bchocolate\b", "chocolate"),
    (Archetype::Sweets, r"\b(?:candy|candies|gummy|gummies|sweets)\b", "candy"),
    (Archetype::Sweets, r"\b(?:cookies?|biscuits?)\b", "cookies"),
    (Archetype::Sweets, r"\bice\s+cream\b", "ice cream"),
    // bakery
    (Archetype::Bakery, r"\b(?:bread|loaf)\b", "bread"),
    (Archetype::Bakery, r"\bbagels?\b", "bagels"),
    (Archetype::Bakery, r"\bmuffins?\b", "muffins"),
    (Archetype::Bakery, r"\b(?:tortillas?|wraps?)\b", "tortillas"),
    (Archetype::Bakery, r"\bcroissants?\b", "croissant"),
    // prepared foods
    (Archetype::PreparedFoods, r"\bpizzas?\b", "pizza"),
    (Archetype::PreparedFoods, r"\b(?:pasta|spaghetti|macaroni|penne|noodles?)\b", "pasta"),
    (Archetype::PreparedFoods, r"\bsoups?\b", "soup"),
    (Archetype::PreparedFoods, r"\b(?:frozen|ready)\s+meals?\b", "ready meal"),
    (Archetype::PreparedFoods, r"\bsandwich(?:es)?\b", "sandwich"),
    // spreads
    (Archetype::Spreads, r"\bpeanut\s+butter\b", "peanut butter"),
    (Archetype::Spreads, r"\balmond\s+butter\b", "almond butter"),
    (Archetype::Spreads, r"\b(?:hazelnut\s+spread|nutella)\b", "hazelnut spread"),
    (Archetype::Spreads, r"\b(?:jam|jelly|preserves|marmalade)\b", "jam"),
    (Archetype::Spreads, r"\bhoney\b", "honey"),
    (Archetype::Spreads, r"\bhummus\b", "hummus"),
];

/// 카테고리 키워드 (정규화된 토큰 안에서 단어 단위로 일치, 복수형 `s`/`es` 허용)
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("dog food", "dog food"),
    ("cat food", "cat food"),
    ("pet food", "pet food"),
    ("breakfast cereal", "cereal"),
    ("cereal bar", "cereal bar"),
    ("snack bar", "snack bar"),
    ("cereal", "cereal"),
    ("yogurt", "yogurt"),
    ("yoghurt", "yogurt"),
    ("cheese", "cheese"),
    ("milk", "milk"),
    ("juice", "juice"),
    ("soda", "soda"),
    ("carbonated", "soda"),
    ("water", "water"),
    ("chip", "chips"),
    ("crisp", "chips"),
    ("cracker", "crackers"),
    ("biscuit", "cookies"),
    ("cookie", "cookies"),
    ("chocolate", "chocolate"),
    ("candies", "candy"),
    ("confectionery", "candy"),
    ("confectioneries", "candy"),
    ("ice cream", "ice cream"),
    ("bread", "bread"),
    ("pasta", "pasta"),
    ("pizza", "pizza"),
    ("soup", "soup"),
    ("meal", "ready meal"),
    ("spread", "spread"),
    ("nut", "nuts"),
    ("snack", "snacks"),
];

const STOP_WORDS: &[&str] = &["with", "from", "made", "flavor", "flavour", "original"];

static RULES: LazyLock<Vec<SearchTermRule>> = LazyLock::new(|| {
    NAME_RULES
        .iter()
        .filter_map(|(archetype, pattern, term)| {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => Some(SearchTermRule {
                    archetype: *archetype,
                    pattern: regex,
                    term: *term,
                }),
                Err(e) => {
                    tracing::error!(pattern = *pattern, error = %e, "invalid search term rule");
                    None
                }
            }
        })
        .collect()
});

static CATEGORY_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .filter_map(|(keyword, term)| {
            let pattern = format!(r"\b{}(?:s|es)?\b", regex::escape(keyword));
            match Regex::new(&pattern) {
                Ok(regex) => Some((regex, *term)),
                Err(e) => {
                    tracing::error!(keyword = *keyword, error = %e, "invalid category keyword");
                    None
                }
            }
        })
        .collect()
});

/// 컴파일된 이름 규칙 표
pub fn rules() -> &'static [SearchTermRule] {
    &RULES
}

/// 제품명과 카테고리 문자열에서 검색어를 추출합니다.
///
/// # Arguments
/// - `name`: 제품명
/// - `categories`: 쉼표로 구분된 카테고리 (`en:` 같은 언어 접두어 허용)
pub fn extract_search_terms(name: &str, categories: Option<&str>) -> Vec<String> {
    let mut terms = match_name_rules(name);

    if terms.is_empty()
        && let Some(categories) = categories
    {
        terms = match_categories(categories);
    }

    if terms.is_empty()
        && let Some(fallback) = significant_words(name)
    {
        terms.push(fallback);
    }

    dedupe_and_cap(terms)
}

/// 1단계: 이름 규칙 표에서 일치하는 모든 검색어 (표 순서)
fn match_name_rules(name: &str) -> Vec<String> {
    rules()
        .iter()
        .filter(|rule| rule.pattern.is_match(name))
        .map(|rule| rule.term.to_owned())
        .collect()
}

/// 2단계: 카테고리 토큰 대조
fn match_categories(categories: &str) -> Vec<String> {
    let mut found = Vec::new();
    for token in categories.split(',') {
        let token = normalize_category(token);
        if token.is_empty() {
            continue;
        }
        if let Some((_, term)) = CATEGORY_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(&token))
        {
            found.push((*term).to_owned());
        }
    }
    found
}

/// `en:breakfast-cereals` → `breakfast cereals`
fn normalize_category(token: &str) -> String {
    let token = token.trim();
    let without_lang = match token.split_once(':') {
        Some((prefix, rest)) if prefix.len() <= 3 => rest,
        _ => token,
    };
    without_lang.trim().to_lowercase().replace(['-', '_'], " ")
}

/// 3단계: 길이 4 이상이고 불용어가 아닌 처음 두 단어
fn significant_words(name: &str) -> Option<String> {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .take(2)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

fn dedupe_and_cap(terms: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(MAX_SEARCH_TERMS);
    for term in terms {
        if unique.len() == MAX_SEARCH_TERMS {
            break;
        }
        if !unique.contains(&term) {
            unique.push(term);
        }
    }
    unique
}
