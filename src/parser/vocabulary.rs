//! Keyword vocabularies used by the field extractor
//!
//! The built-in lists cover Russian-language analyst vacancies. A TOML file
//! with the same layout replaces them at runtime:
//!
//! ```toml
//! hard_skills = ["sql", "python"]
//! soft_skills = ["team"]
//!
//! [grade]
//! senior = ["senior", "lead"]
//! middle = ["middle"]
//! junior = ["junior", "intern"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};

const HARD_SKILLS: &[&str] = &[
    "sql",
    "python",
    "excel",
    "tableau",
    "power bi",
    "bi",
    "etl",
    "olap",
    "базы данных",
    "mysql",
    "postgresql",
    "oracle",
    "ms sql",
    "clickhouse",
    "airflow",
    "dbt",
    "superset",
    "redash",
    "metabase",
    "hadoop",
    "spark",
    "statistics",
    "математика",
    "анализ данных",
    "machine learning",
    "ml",
    "r language",
    "r studio",
    "pandas",
    "numpy",
    "scikit",
    "tensorflow",
    "powerpoint",
    "word",
    "access",
    "vba",
    "git",
    "docker",
    "kubernetes",
    "api",
    "json",
    "xml",
    "html",
    "css",
    "javascript",
    "nosql",
    "mongodb",
    "redis",
    "kafka",
    "aws",
    "azure",
    "google cloud",
    "gcp",
];

const SOFT_SKILLS: &[&str] = &[
    "коммуникация",
    "общение",
    "переговоры",
    "презентация",
    "лидерство",
    "управление",
    "менеджмент",
    "команда",
    "team",
    "аналитическое мышление",
    "решение проблем",
    "problem solving",
    "критическое мышление",
    "тайм-менеджмент",
    "time management",
    "организация",
    "планирование",
    "адаптивность",
    "гибкость",
    "креативность",
    "творчество",
    "стрессоустойчивость",
    "ответственность",
    "инициативность",
    "мотивация",
    "обучаемость",
    "внимание к деталям",
    "multitasking",
    "многозадачность",
];

const SENIOR_KEYWORDS: &[&str] = &["senior", "ведущий", "руковод", "team lead", "главный"];
const MIDDLE_KEYWORDS: &[&str] = &["middle", "опытный", "с опытом"];
const JUNIOR_KEYWORDS: &[&str] = &["junior", "начальный", "стажер", "trainee", "без опыта"];

/// Grade keywords, scanned senior first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeKeywords {
    #[serde(default)]
    pub senior: Vec<String>,
    #[serde(default)]
    pub middle: Vec<String>,
    #[serde(default)]
    pub junior: Vec<String>,
}

/// Skill and grade vocabularies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub grade: GradeKeywords,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            hard_skills: to_owned(HARD_SKILLS),
            soft_skills: to_owned(SOFT_SKILLS),
            grade: GradeKeywords {
                senior: to_owned(SENIOR_KEYWORDS),
                middle: to_owned(MIDDLE_KEYWORDS),
                junior: to_owned(JUNIOR_KEYWORDS),
            },
        }
    }
}

impl Vocabulary {
    /// Load a vocabulary from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and normalize a vocabulary from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let vocabulary: Self = toml::from_str(content)?;
        let vocabulary = vocabulary.normalized();
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Serialize to TOML, the format accepted by [`Vocabulary::from_toml`]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Lower-case and trim every term, dropping empties and repeats
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            hard_skills: normalize_terms(self.hard_skills),
            soft_skills: normalize_terms(self.soft_skills),
            grade: GradeKeywords {
                senior: normalize_terms(self.grade.senior),
                middle: normalize_terms(self.grade.middle),
                junior: normalize_terms(self.grade.junior),
            },
        }
    }

    /// Hard and soft skill lists must not share terms
    pub fn validate(&self) -> Result<()> {
        let hard: HashSet<&str> = self.hard_skills.iter().map(String::as_str).collect();
        let mut overlap: Vec<&str> = self
            .soft_skills
            .iter()
            .map(String::as_str)
            .filter(|t| hard.contains(t))
            .collect();

        if !overlap.is_empty() {
            overlap.sort_unstable();
            return Err(Error::config(format!(
                "terms listed as both hard and soft skills: {}",
                overlap.join(", ")
            )));
        }

        Ok(())
    }
}

fn to_owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_string()).collect()
}

fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
