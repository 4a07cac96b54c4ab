// Core data structures for the vacancy harvester

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Categorical sub-object of a vacancy (`{"id": ..., "name": ...}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedRef {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Name of an optional sub-object, tolerating both levels being absent
pub fn ref_name(r: Option<&NamedRef>) -> Option<String> {
    r.and_then(|r| r.name.clone())
}

/// Search result entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VacancySummary {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub employer: Option<NamedRef>,
}

impl VacancySummary {
    /// Employer display name, if the search page carried one
    pub fn employer_name(&self) -> Option<&str> {
        self.employer.as_ref().and_then(|e| e.name.as_deref())
    }
}

/// One page of the search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchPage {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<VacancySummary>,
    #[serde(deserialize_with = "null_as_default")]
    pub pages: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub found: u64,
}

/// Salary block of a vacancy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Salary {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub currency: Option<String>,
}

/// Entry of the `key_skills` list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySkill {
    pub name: Option<String>,
}

/// Full vacancy as returned by the detail endpoint
///
/// Every sub-object is optional; JSON `null` and a missing key are the same.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VacancyDetail {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub published_at: Option<String>,
    pub alternate_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<NamedRef>,
    pub employer: Option<NamedRef>,
    pub department: Option<NamedRef>,
    pub area: Option<NamedRef>,
    pub experience: Option<NamedRef>,
    pub schedule: Option<NamedRef>,
    pub employment: Option<NamedRef>,
    pub description: Option<String>,
    pub salary: Option<Salary>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_skills: Vec<KeySkill>,
}

impl VacancyDetail {
    /// Experience bracket identifier (`noExperience`, `between1And3`, ...)
    pub fn experience_id(&self) -> Option<&str> {
        self.experience.as_ref().and_then(|e| e.id.as_deref())
    }

    /// True when neither id nor name is present, e.g. a `{}` body
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Names of the structured skill tags, skipping unnamed entries
    pub fn key_skill_names(&self) -> Vec<String> {
        self.key_skills
            .iter()
            .filter_map(|s| s.name.clone())
            .collect()
    }
}

/// Derived seniority grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Junior,
    #[serde(rename = "Junior+")]
    JuniorPlus,
    Middle,
    Senior,
    Unknown,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::JuniorPlus => "Junior+",
            Self::Middle => "Middle",
            Self::Senior => "Senior",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named salary range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryBin {
    #[serde(rename = "under 50k")]
    Under50k,
    #[serde(rename = "50k-100k")]
    From50kTo100k,
    #[serde(rename = "100k-150k")]
    From100kTo150k,
    #[serde(rename = "150k-200k")]
    From150kTo200k,
    #[serde(rename = "200k-300k")]
    From200kTo300k,
    #[serde(rename = "300k+")]
    Over300k,
    #[serde(rename = "unspecified")]
    Unspecified,
}

impl SalaryBin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under50k => "under 50k",
            Self::From50kTo100k => "50k-100k",
            Self::From100kTo150k => "100k-150k",
            Self::From150kTo200k => "150k-200k",
            Self::From200kTo300k => "200k-300k",
            Self::Over300k => "300k+",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for SalaryBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skills matched in a description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    pub hard: BTreeSet<String>,
    pub soft: BTreeSet<String>,
}

/// Fields derived from a vacancy by the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub skills: SkillSet,
    pub grade: Grade,
    pub salary_bin: SalaryBin,
}

/// One row of the output table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub id: String,
    pub name: Option<String>,
    pub published_at: Option<String>,
    pub alternate_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub employer: Option<String>,
    pub department: Option<String>,
    pub area: Option<String>,
    pub experience: Option<String>,
    #[serde(serialize_with = "bracketed")]
    pub key_skills: Vec<String>,
    pub schedule: Option<String>,
    pub employment: Option<String>,
    pub description: Option<String>,
    pub salary_from: Option<f64>,
    pub salary_to: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_bin: SalaryBin,
    #[serde(serialize_with = "bracketed")]
    pub key_skills_from_key_skills_field: Vec<String>,
    #[serde(rename = "hard_skills_from_description", serialize_with = "bracketed")]
    pub hard_skills: BTreeSet<String>,
    #[serde(rename = "soft_skills_from_description", serialize_with = "bracketed")]
    pub soft_skills: BTreeSet<String>,
    pub grade: Grade,
    pub search_query: String,
}

impl EnrichedRecord {
    /// Column names in output order
    pub const COLUMNS: [&'static str; 22] = [
        "id",
        "name",
        "published_at",
        "alternate_url",
        "type",
        "employer",
        "department",
        "area",
        "experience",
        "key_skills",
        "schedule",
        "employment",
        "description",
        "salary_from",
        "salary_to",
        "salary_currency",
        "salary_bin",
        "key_skills_from_key_skills_field",
        "hard_skills_from_description",
        "soft_skills_from_description",
        "grade",
        "search_query",
    ];

    /// Assemble a row from a detail record and its derived fields
    pub fn assemble(
        id: String,
        detail: VacancyDetail,
        derived: DerivedFields,
        search_query: &str,
    ) -> Self {
        let key_skills = detail.key_skill_names();
        let salary = detail.salary.unwrap_or_default();

        Self {
            id,
            name: detail.name,
            published_at: detail.published_at,
            alternate_url: detail.alternate_url,
            kind: ref_name(detail.kind.as_ref()),
            employer: ref_name(detail.employer.as_ref()),
            department: ref_name(detail.department.as_ref()),
            area: ref_name(detail.area.as_ref()),
            experience: ref_name(detail.experience.as_ref()),
            key_skills_from_key_skills_field: key_skills.clone(),
            key_skills,
            schedule: ref_name(detail.schedule.as_ref()),
            employment: ref_name(detail.employment.as_ref()),
            description: detail.description,
            salary_from: salary.from,
            salary_to: salary.to,
            salary_currency: salary.currency,
            salary_bin: derived.salary_bin,
            hard_skills: derived.skills.hard,
            soft_skills: derived.skills.soft,
            grade: derived.grade,
            search_query: search_query.to_string(),
        }
    }
}

/// Collected rows across all search queries
///
/// The same vacancy found by two queries appears twice, once per query.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EnrichedRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// Rows produced by `query`, in collection order
    pub fn partition(&self, query: &str) -> Vec<&EnrichedRecord> {
        self.records
            .iter()
            .filter(|r| r.search_query == query)
            .collect()
    }

    /// Distinct queries in order of first appearance
    pub fn queries(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.search_query.as_str()) {
                seen.push(record.search_query.as_str());
            }
        }
        seen
    }
}

impl IntoIterator for Dataset {
    type Item = EnrichedRecord;
    type IntoIter = std::vec::IntoIter<EnrichedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Render a list the way list-valued cells are stored: `['a', 'b']`
pub fn format_bracketed_list<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let quoted: Vec<String> = items.into_iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn bracketed<T, S>(items: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    for<'a> &'a T: IntoIterator<Item = &'a String>,
    S: Serializer,
{
    serializer.serialize_str(&format_bracketed_list(items))
}

/// Accept a string or a number as an identifier; anything else is absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_tolerates_nulls() {
        let json = r#"{
            "id": "93353083",
            "name": "Data Analyst",
            "employer": null,
            "experience": {"id": "between1And3", "name": "1-3 years"},
            "salary": null,
            "key_skills": null,
            "area": {"id": 1, "name": "Moscow"}
        }"#;
        let detail: VacancyDetail = serde_json::from_str(json).unwrap();

        assert_eq!(detail.id.as_deref(), Some("93353083"));
        assert!(detail.employer.is_none());
        assert!(detail.salary.is_none());
        assert!(detail.key_skills.is_empty());
        assert_eq!(detail.experience_id(), Some("between1And3"));
        assert_eq!(detail.area.as_ref().unwrap().id.as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_object_parses() {
        let detail: VacancyDetail = serde_json::from_str("{}").unwrap();
        assert!(detail.is_empty());
        assert!(detail.name.is_none());
        assert!(detail.experience_id().is_none());
    }

    #[test]
    fn test_search_page_defaults() {
        let page: SearchPage = serde_json::from_str(r#"{"found": 0}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn test_format_bracketed_list() {
        let items = vec!["sql".to_string(), "excel".to_string()];
        assert_eq!(format_bracketed_list(&items), "['sql', 'excel']");
        assert_eq!(format_bracketed_list(&Vec::<String>::new()), "[]");
    }

    #[test]
    fn test_assemble_flattens_sub_objects() {
        let detail: VacancyDetail = serde_json::from_str(
            r#"{
                "id": "1",
                "name": "Analyst",
                "type": {"id": "open", "name": "Open"},
                "employer": {"name": "Acme"},
                "salary": {"from": 100000, "to": null, "currency": "RUR"},
                "key_skills": [{"name": "SQL"}, {"name": "Excel"}]
            }"#,
        )
        .unwrap();
        let derived = DerivedFields {
            skills: SkillSet::default(),
            grade: Grade::Unknown,
            salary_bin: SalaryBin::From100kTo150k,
        };

        let record = EnrichedRecord::assemble("1".to_string(), detail, derived, "q");

        assert_eq!(record.kind.as_deref(), Some("Open"));
        assert_eq!(record.employer.as_deref(), Some("Acme"));
        assert!(record.department.is_none());
        assert_eq!(record.salary_from, Some(100000.0));
        assert_eq!(record.salary_currency.as_deref(), Some("RUR"));
        assert_eq!(record.key_skills, vec!["SQL", "Excel"]);
        assert_eq!(record.key_skills_from_key_skills_field, record.key_skills);
        assert_eq!(record.search_query, "q");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Grade::JuniorPlus.to_string(), "Junior+");
        assert_eq!(SalaryBin::Under50k.to_string(), "under 50k");
        assert_eq!(SalaryBin::Unspecified.as_str(), "unspecified");
    }
}
