//! Table-wide text cleanup for collected datasets
//!
//! Flattens list-valued columns and strips markup from the description
//! column. Columns that are not configured pass through untouched; configured
//! columns missing from the table are reported and skipped.

use crate::config::NormalizerConfig;
use crate::parser::sanitize::{flatten_list_cell, strip_markup};
use crate::storage::Table;

/// Which columns were rewritten and which were expected but absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub treated: Vec<String>,
    pub missing: Vec<String>,
}

/// Column-oriented cleaner for a loaded [`Table`]
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    list_columns: Vec<String>,
    markup_column: Option<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }
}

impl TextNormalizer {
    pub fn new(list_columns: Vec<String>, markup_column: Option<String>) -> Self {
        Self {
            list_columns,
            markup_column,
        }
    }

    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(config.list_columns.clone(), config.markup_column.clone())
    }

    /// Clean the configured columns in place
    ///
    /// # Examples
    ///
    /// ```
    /// use hh_harvest::parser::TextNormalizer;
    /// use hh_harvest::storage::Table;
    ///
    /// let table = Table::new(
    ///     vec!["key_skills".into(), "description".into()],
    ///     vec![vec!["['sql', 'excel']".into(), "<p>Hello</p>".into()]],
    /// );
    /// let (table, report) = TextNormalizer::default().normalize(table);
    ///
    /// assert_eq!(table.rows()[0], vec!["sql, excel", "Hello"]);
    /// assert!(report.missing.contains(&"soft_skills_from_description".to_string()));
    /// ```
    pub fn normalize(&self, mut table: Table) -> (Table, NormalizeReport) {
        let mut report = NormalizeReport::default();

        for column in &self.list_columns {
            if table.map_column(column, |v| flatten_list_cell(Some(v))) {
                report.treated.push(column.clone());
            } else {
                report.missing.push(column.clone());
            }
        }

        if let Some(column) = &self.markup_column {
            if table.map_column(column, |v| strip_markup(Some(v))) {
                report.treated.push(column.clone());
            } else {
                report.missing.push(column.clone());
            }
        }

        for column in &report.treated {
            tracing::info!(column = %column, "Column cleaned");
        }
        for column in &report.missing {
            tracing::warn!(column = %column, "Column not found, skipping");
        }

        (table, report)
    }
}
