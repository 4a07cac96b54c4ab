//! Field derivation for a single vacancy
//!
//! Skills, grade and salary bucket are computed from the detail record. All
//! three functions are total: absent sub-objects and empty strings degrade to
//! empty sets, [`Grade::Unknown`] and [`SalaryBin::Unspecified`].
//!
//! Matching is plain substring containment on lower-cased text, so a short
//! term such as `bi` also hits inside longer words. This is an accepted
//! approximation.

use std::collections::BTreeSet;

use crate::models::{DerivedFields, Grade, Salary, SalaryBin, SkillSet, VacancyDetail};
use crate::parser::vocabulary::Vocabulary;

/// The only currency that is bucketed
pub const ACCEPTED_CURRENCY: &str = "RUR";

/// Ascending upper bounds (exclusive) and their buckets
const SALARY_LADDER: [(f64, SalaryBin); 5] = [
    (50_000.0, SalaryBin::Under50k),
    (100_000.0, SalaryBin::From50kTo100k),
    (150_000.0, SalaryBin::From100kTo150k),
    (200_000.0, SalaryBin::From150kTo200k),
    (300_000.0, SalaryBin::From200kTo300k),
];

/// Derives skills, grade and salary bucket using a vocabulary
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    vocabulary: Vocabulary,
}

impl FieldExtractor {
    /// The vocabulary is normalized (lower-cased, trimmed) on the way in
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary: vocabulary.normalized(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Derive every computed column for one vacancy
    pub fn extract(&self, detail: &VacancyDetail) -> DerivedFields {
        let description = detail.description.as_deref();

        DerivedFields {
            skills: self.extract_skills(description),
            grade: self.determine_grade(
                detail.name.as_deref(),
                detail.experience_id(),
                description,
            ),
            salary_bin: salary_bin(detail.salary.as_ref()),
        }
    }

    /// Hard and soft skill terms contained in the description
    pub fn extract_skills(&self, description: Option<&str>) -> SkillSet {
        let text = match description {
            Some(d) if !d.is_empty() => d.to_lowercase(),
            _ => return SkillSet::default(),
        };

        SkillSet {
            hard: matching_terms(&self.vocabulary.hard_skills, &text),
            soft: matching_terms(&self.vocabulary.soft_skills, &text),
        }
    }

    /// Seniority from the experience bracket, then keywords, else Unknown
    pub fn determine_grade(
        &self,
        name: Option<&str>,
        experience_id: Option<&str>,
        description: Option<&str>,
    ) -> Grade {
        if let Some(grade) = experience_id.and_then(grade_from_bracket) {
            return grade;
        }

        let text = format!(
            "{} {}",
            name.unwrap_or_default(),
            description.unwrap_or_default()
        )
        .to_lowercase();

        let keywords = &self.vocabulary.grade;
        [
            (&keywords.senior, Grade::Senior),
            (&keywords.middle, Grade::Middle),
            (&keywords.junior, Grade::Junior),
        ]
        .into_iter()
        .find(|(terms, _)| terms.iter().any(|t| text.contains(t.as_str())))
        .map_or(Grade::Unknown, |(_, grade)| grade)
    }
}

/// Exact mapping of the API's experience bracket ids
pub fn grade_from_bracket(id: &str) -> Option<Grade> {
    match id.to_lowercase().as_str() {
        "noexperience" => Some(Grade::Junior),
        "between1and3" => Some(Grade::JuniorPlus),
        "between3and6" => Some(Grade::Middle),
        "morethan6" => Some(Grade::Senior),
        _ => None,
    }
}

/// Bucket a salary; non-RUR or boundless salaries are unspecified
pub fn salary_bin(salary: Option<&Salary>) -> SalaryBin {
    let Some(salary) = salary else {
        return SalaryBin::Unspecified;
    };

    if salary.currency.as_deref() != Some(ACCEPTED_CURRENCY) {
        return SalaryBin::Unspecified;
    }

    let value = match (salary.from, salary.to) {
        (Some(from), Some(to)) => (from + to) / 2.0,
        (Some(from), None) => from,
        (None, Some(to)) => to,
        (None, None) => return SalaryBin::Unspecified,
    };

    bin_for_value(value)
}

/// Map a representative salary onto the threshold ladder
pub fn bin_for_value(value: f64) -> SalaryBin {
    SALARY_LADDER
        .iter()
        .find(|(upper, _)| value < *upper)
        .map_or(SalaryBin::Over300k, |(_, bin)| *bin)
}

fn matching_terms(terms: &[String], text: &str) -> BTreeSet<String> {
    terms
        .iter()
        .filter(|t| text.contains(t.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rur(from: Option<f64>, to: Option<f64>) -> Salary {
        Salary {
            from,
            to,
            currency: Some(ACCEPTED_CURRENCY.to_string()),
        }
    }

    #[test]
    fn test_extract_skills_matches_both_vocabularies() {
        let extractor = FieldExtractor::default();
        let skills = extractor.extract_skills(Some(
            "<p>Нужен опыт SQL и Python, работа в команде, Коммуникация с заказчиком</p>",
        ));

        assert!(skills.hard.contains("sql"));
        assert!(skills.hard.contains("python"));
        assert!(skills.soft.contains("коммуникация"));
        assert!(!skills.soft.contains("team"));
    }

    #[test]
    fn test_extract_skills_substring_semantics() {
        let extractor = FieldExtractor::default();
        let skills = extractor.extract_skills(Some("Experience with MySQL"));

        assert!(skills.hard.contains("mysql"));
        assert!(skills.hard.contains("sql"));
    }

    #[test]
    fn test_extract_skills_empty_description() {
        let extractor = FieldExtractor::default();
        assert_eq!(extractor.extract_skills(None), SkillSet::default());
        assert_eq!(extractor.extract_skills(Some("")), SkillSet::default());
    }

    #[test]
    fn test_extract_skills_casing_independent_and_idempotent() {
        let extractor = FieldExtractor::default();
        let lower = extractor.extract_skills(Some("tableau, excel, team player"));
        let upper = extractor.extract_skills(Some("TABLEAU, EXCEL, TEAM PLAYER"));
        let again = extractor.extract_skills(Some("tableau, excel, team player"));

        assert_eq!(lower, upper);
        assert_eq!(lower, again);
    }

    #[test]
    fn test_bracket_wins_over_keywords() {
        let extractor = FieldExtractor::default();
        let grade = extractor.determine_grade(
            Some("Analyst"),
            Some("between3And6"),
            Some("Junior position, trainee welcome"),
        );
        assert_eq!(grade, Grade::Middle);
    }

    #[test]
    fn test_bracket_mapping() {
        assert_eq!(grade_from_bracket("noExperience"), Some(Grade::Junior));
        assert_eq!(grade_from_bracket("between1And3"), Some(Grade::JuniorPlus));
        assert_eq!(grade_from_bracket("between3And6"), Some(Grade::Middle));
        assert_eq!(grade_from_bracket("moreThan6"), Some(Grade::Senior));
        assert_eq!(grade_from_bracket("someday"), None);
    }

    #[test]
    fn test_keyword_priority_senior_first() {
        let extractor = FieldExtractor::default();
        let grade = extractor.determine_grade(
            Some("Junior/Senior Data Analyst"),
            None,
            Some("Ищем junior специалиста"),
        );
        assert_eq!(grade, Grade::Senior);
    }

    #[test]
    fn test_unknown_bracket_falls_through_to_keywords() {
        let extractor = FieldExtractor::default();
        let grade = extractor.determine_grade(Some("Middle analyst"), Some("other"), None);
        assert_eq!(grade, Grade::Middle);
    }

    #[test]
    fn test_grade_unknown_without_signals() {
        let extractor = FieldExtractor::default();
        assert_eq!(extractor.determine_grade(None, None, None), Grade::Unknown);
        assert_eq!(
            extractor.determine_grade(Some("Analyst"), None, Some("")),
            Grade::Unknown
        );
    }

    #[test]
    fn test_custom_vocabulary_is_used() {
        let mut vocabulary = Vocabulary::default();
        vocabulary.grade.junior.push("Intern".to_string());
        let extractor = FieldExtractor::new(vocabulary);

        assert_eq!(
            extractor.determine_grade(Some("Summer intern"), None, None),
            Grade::Junior
        );
    }

    #[test]
    fn test_salary_bin_average_and_single_bound() {
        assert_eq!(
            salary_bin(Some(&rur(Some(80_000.0), Some(120_000.0)))),
            SalaryBin::From100kTo150k
        );
        assert_eq!(
            salary_bin(Some(&rur(Some(40_000.0), None))),
            SalaryBin::Under50k
        );
        assert_eq!(
            salary_bin(Some(&rur(None, Some(350_000.0)))),
            SalaryBin::Over300k
        );
        assert_eq!(salary_bin(Some(&rur(None, None))), SalaryBin::Unspecified);
        assert_eq!(salary_bin(None), SalaryBin::Unspecified);
    }

    #[test]
    fn test_salary_bin_boundaries_go_up() {
        assert_eq!(bin_for_value(49_999.0), SalaryBin::Under50k);
        assert_eq!(bin_for_value(50_000.0), SalaryBin::From50kTo100k);
        assert_eq!(bin_for_value(100_000.0), SalaryBin::From100kTo150k);
        assert_eq!(bin_for_value(150_000.0), SalaryBin::From150kTo200k);
        assert_eq!(bin_for_value(200_000.0), SalaryBin::From200kTo300k);
        assert_eq!(bin_for_value(300_000.0), SalaryBin::Over300k);
    }

    #[test]
    fn test_extract_on_empty_detail() {
        let extractor = FieldExtractor::default();
        let derived = extractor.extract(&VacancyDetail::default());

        assert_eq!(derived.skills, SkillSet::default());
        assert_eq!(derived.grade, Grade::Unknown);
        assert_eq!(derived.salary_bin, SalaryBin::Unspecified);
    }

    proptest! {
        #[test]
        fn prop_foreign_currency_is_unspecified(
            from in proptest::option::of(0.0f64..1e7),
            to in proptest::option::of(0.0f64..1e7),
            currency in "[A-Z]{3}",
        ) {
            prop_assume!(currency != ACCEPTED_CURRENCY);
            let salary = Salary { from, to, currency: Some(currency) };
            prop_assert_eq!(salary_bin(Some(&salary)), SalaryBin::Unspecified);
        }

        #[test]
        fn prop_ladder_is_exhaustive_and_ordered(v in 0.0f64..1e7) {
            let bin = bin_for_value(v);
            let expected = if v < 50_000.0 {
                SalaryBin::Under50k
            } else if v < 100_000.0 {
                SalaryBin::From50kTo100k
            } else if v < 150_000.0 {
                SalaryBin::From100kTo150k
            } else if v < 200_000.0 {
                SalaryBin::From150kTo200k
            } else if v < 300_000.0 {
                SalaryBin::From200kTo300k
            } else {
                SalaryBin::Over300k
            };
            prop_assert_eq!(bin, expected);
            prop_assert_ne!(bin, SalaryBin::Unspecified);
        }
    }
}
