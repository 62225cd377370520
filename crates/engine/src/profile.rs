//! 제품 레코드 → 건강 프로필 변환

use healthswap_core::types::{ProductHealthProfile, ProductRecord};

/// 사용자 회피 목록을 적용해 [`ProductHealthProfile`]을 만드는 빌더
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    avoid_terms: Vec<String>,
}

impl ProfileBuilder {
    /// 회피 성분 목록으로 빌더를 생성합니다. 빈 항목은 무시합니다.
    pub fn new(avoid_ingredients: &[String]) -> Self {
        let avoid_terms = avoid_ingredients
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { avoid_terms }
    }

    /// 레코드에서 프로필을 만듭니다.
    ///
    /// 건강 등급 힌트는 성분 목록이 비어 있을 때만 복사합니다.
    /// 성분 데이터가 있으면 회피 성분 수가 그 역할을 대신합니다.
    pub fn build(&self, record: &ProductRecord) -> ProductHealthProfile {
        let health_rating_hint = if record.ingredients.is_empty() {
            record.health_rating
        } else {
            None
        };

        ProductHealthProfile {
            nutriscore_grade: record.nutriscore_grade,
            nova_group: record.nova_group,
            flagged_ingredient_count: self.flagged_ingredient_count(&record.ingredients),
            additive_count: u32::try_from(record.additive_tags.len()).unwrap_or(u32::MAX),
            health_rating_hint,
        }
    }

    /// 회피 항목을 하나라도 포함하는 성분 수 (성분당 최대 1회)
    pub fn flagged_ingredient_count(&self, ingredients: &[String]) -> u32 {
        if self.avoid_terms.is_empty() {
            return 0;
        }
        let flagged = ingredients
            .iter()
            .filter(|ingredient| {
                let lowered = ingredient.to_lowercase();
                self.avoid_terms.iter().any(|term| lowered.contains(term.as_str()))
            })
            .count();
        u32::try_from(flagged).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use healthswap_core::types::{HealthRating, NovaGroup, NutriScoreGrade};

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn copies_grades_and_counts_additives() {
        let record = ProductRecord {
            nutriscore_grade: Some(NutriScoreGrade::C),
            nova_group: Some(NovaGroup::Processed),
            additive_tags: strings(&["en:e330", "en:e415"]),
            ..Default::default()
        };
        let profile = ProfileBuilder::default().build(&record);
        assert_eq!(profile.nutriscore_grade, Some(NutriScoreGrade::C));
        assert_eq!(profile.nova_group, Some(NovaGroup::Processed));
        assert_eq!(profile.additive_count, 2);
        assert_eq!(profile.flagged_ingredient_count, 0);
    }

    #[test]
    fn flags_each_ingredient_once() {
        let builder = ProfileBuilder::new(&strings(&["sugar", "syrup"]));
        let count = builder.flagged_ingredient_count(&strings(&[
            "Glucose-fructose syrup with cane sugar",
            "Oats",
            "Brown SUGAR",
        ]));
        assert_eq!(count, 2);
    }

    #[test]
    fn avoid_terms_are_trimmed_and_case_insensitive() {
        let builder = ProfileBuilder::new(&strings(&["  Palm Oil ", ""]));
        assert_eq!(
            builder.flagged_ingredient_count(&strings(&["palm oil", "sunflower oil"])),
            1
        );
    }

    #[test]
    fn hint_used_only_without_ingredients() {
        let mut record = ProductRecord {
            health_rating: Some(HealthRating::Healthy),
            ..Default::default()
        };
        let builder = ProfileBuilder::default();
        assert_eq!(
            builder.build(&record).health_rating_hint,
            Some(HealthRating::Healthy)
        );

        record.ingredients = strings(&["water"]);
        assert!(builder.build(&record).health_rating_hint.is_none());
    }

    #[test]
    fn empty_avoid_list_flags_nothing() {
        let builder = ProfileBuilder::new(&[]);
        assert_eq!(builder.flagged_ingredient_count(&strings(&["sugar"])), 0);
    }
}
