//! 도메인 타입 — 점수 계산, 비교, 대체품 탐색 전역에서 사용되는 공통 타입
//!
//! 스캔/조회 협력자(collaborator)가 넘겨주는 [`ProductRecord`]와
//! 엔진이 질의 시점에 파생하는 [`ProductHealthProfile`], [`HealthScore`]를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nutri-Score 등급
///
/// 전면 영양 등급 A–E (A가 가장 좋음).
/// `Ord` 구현으로 등급 비교가 가능합니다 (`A < B < C < D < E`, 작을수록 건강함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutriScoreGrade {
    #[serde(alias = "A")]
    A,
    #[serde(alias = "B")]
    B,
    #[serde(alias = "C")]
    C,
    #[serde(alias = "D")]
    D,
    #[serde(alias = "E")]
    E,
}

impl NutriScoreGrade {
    /// 문자열에서 등급을 파싱합니다 (대소문자 구분 없음).
    ///
    /// 카탈로그는 `"not-applicable"`, `"unknown"` 같은 값도 내려주므로
    /// a–e 이외의 값은 모두 `None`입니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            "d" => Some(Self::D),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    /// 등급 순위 (A=1 … E=5)
    pub fn rank(&self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
            Self::D => 4,
            Self::E => 5,
        }
    }

    /// 대문자 등급 문자
    pub fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }
}

impl fmt::Display for NutriScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// NOVA 가공 분류 (1 = 비가공, 4 = 초가공)
///
/// 직렬화 시 정수 1–4로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NovaGroup {
    /// 비가공 또는 최소 가공 식품
    Unprocessed,
    /// 가공된 조리 재료
    CulinaryIngredient,
    /// 가공 식품
    Processed,
    /// 초가공 식품
    UltraProcessed,
}

impl NovaGroup {
    /// 그룹 번호 (1–4)
    pub fn number(&self) -> u8 {
        match self {
            Self::Unprocessed => 1,
            Self::CulinaryIngredient => 2,
            Self::Processed => 3,
            Self::UltraProcessed => 4,
        }
    }

    /// 숫자에서 그룹을 생성합니다. 1–4 이외의 값은 `None`입니다.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Unprocessed),
            2 => Some(Self::CulinaryIngredient),
            3 => Some(Self::Processed),
            4 => Some(Self::UltraProcessed),
            _ => None,
        }
    }
}

impl TryFrom<u8> for NovaGroup {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("nova group must be 1-4, got {value}"))
    }
}

impl From<NovaGroup> for u8 {
    fn from(group: NovaGroup) -> Self {
        group.number()
    }
}

impl fmt::Display for NovaGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// 3단계 건강 등급 힌트
///
/// 성분 단위 데이터가 없을 때(예: 스캔 기록 추세 분석)만 점수에 반영되는 대략적인 힌트입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRating {
    Healthy,
    Moderate,
    Unhealthy,
    #[default]
    Unknown,
}

impl HealthRating {
    /// 문자열에서 등급을 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "healthy" => Some(Self::Healthy),
            "moderate" => Some(Self::Moderate),
            "unhealthy" => Some(Self::Unhealthy),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for HealthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Moderate => write!(f, "moderate"),
            Self::Unhealthy => write!(f, "unhealthy"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// 카탈로그 종류 — 검색 엔드포인트를 선택합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// 일반 식품 카탈로그
    #[default]
    Food,
    /// 반려동물 사료 카탈로그
    PetFood,
}

impl CatalogKind {
    /// 문자열에서 카탈로그 종류를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "food" | "standard" => Some(Self::Food),
            "pet_food" | "petfood" | "pet" => Some(Self::PetFood),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Food => write!(f, "food"),
            Self::PetFood => write!(f, "pet_food"),
        }
    }
}

/// 건강 점수 계산 입력
///
/// 질의 시점에 제품별로 파생되는 불변 스냅샷입니다. 엔진은 이 값을 저장하지 않습니다.
/// 값이 없는 필드는 점수에 정확히 0을 기여합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductHealthProfile {
    /// Nutri-Score 등급
    pub nutriscore_grade: Option<NutriScoreGrade>,
    /// NOVA 그룹
    pub nova_group: Option<NovaGroup>,
    /// 사용자 회피 목록과 일치한 성분 수
    pub flagged_ingredient_count: u32,
    /// 검출된 첨가물 수
    pub additive_count: u32,
    /// 대략적인 건강 등급 힌트
    pub health_rating_hint: Option<HealthRating>,
}

impl ProductHealthProfile {
    /// 점수에 의미 있는 등급 데이터(Nutri-Score, NOVA, 힌트)가 하나라도 있는지 확인합니다.
    pub fn has_scoring_data(&self) -> bool {
        self.nutriscore_grade.is_some()
            || self.nova_group.is_some()
            || matches!(
                self.health_rating_hint,
                Some(HealthRating::Healthy | HealthRating::Unhealthy | HealthRating::Moderate)
            )
    }
}

/// 건강 점수 `[0, 100]`
///
/// 엔진 내부의 합성 지표입니다. 외부 표준이 아닙니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct HealthScore(u8);

impl HealthScore {
    /// 최저 점수
    pub const MIN: Self = Self(0);
    /// 최고 점수
    pub const MAX: Self = Self(100);

    /// 임의의 정수 합계를 `[0, 100]`으로 잘라 점수를 만듭니다.
    pub fn clamped(raw: i32) -> Self {
        let bounded = raw.clamp(0, 100);
        Self(u8::try_from(bounded).unwrap_or(100))
    }

    /// 점수 값
    pub fn value(&self) -> u8 {
        self.0
    }

    /// `other`에 대한 부호 있는 차이 (`self - other`)
    pub fn diff(&self, other: HealthScore) -> i32 {
        i32::from(self.0) - i32::from(other.0)
    }
}

impl TryFrom<u8> for HealthScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX.0 {
            return Err(format!("health score must be 0-100, got {value}"));
        }
        Ok(Self(value))
    }
}

impl From<HealthScore> for u8 {
    fn from(score: HealthScore) -> Self {
        score.0
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 스캔/조회 협력자가 제공하는 제품 레코드
///
/// 엔진은 이 레코드에서 [`ProductHealthProfile`]을 만들고,
/// 대체품 검색어와 카탈로그 종류, 포장 용량을 읽습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRecord {
    /// 바코드 (카탈로그 식별자)
    pub barcode: String,
    /// 제품명
    pub name: String,
    /// 브랜드
    pub brand: Option<String>,
    /// 쉼표로 구분된 카테고리 문자열
    pub categories: Option<String>,
    /// 검색 대상 카탈로그
    pub catalog: CatalogKind,
    /// Nutri-Score 등급
    pub nutriscore_grade: Option<NutriScoreGrade>,
    /// NOVA 그룹
    pub nova_group: Option<NovaGroup>,
    /// 성분 목록 (없으면 비어 있음)
    pub ingredients: Vec<String>,
    /// 첨가물 태그 (예: `en:e330`)
    pub additive_tags: Vec<String>,
    /// 알레르기 유발 성분
    pub allergens: Vec<String>,
    /// 포장 용량 원문 (예: `"500 g"`)
    pub quantity: Option<String>,
    /// 이미지 URL
    pub image_url: Option<String>,
    /// 대략적인 건강 등급 (성분 데이터가 없을 때만 사용)
    pub health_rating: Option<HealthRating>,
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.brand {
            Some(brand) => write!(f, "{} ({}) [{}]", self.name, brand, self.barcode),
            None => write!(f, "{} [{}]", self.name, self.barcode),
        }
    }
}
