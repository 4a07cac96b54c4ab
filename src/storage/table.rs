//! In-memory delimited table with a tolerant loader
//!
//! Loading walks a chain of increasingly permissive strategies:
//!
//! 1. `strict`: UTF-8 text, rows with the wrong field count are skipped
//! 2. `lossy`: raw bytes decoded lossily as UTF-8, wrong-width rows skipped
//! 3. `padded`: short rows padded with empty cells, long rows truncated
//!
//! Only when every strategy fails is [`TableError::Unreadable`] returned.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::utils::error::TableError;

const BOM: char = '\u{FEFF}';

/// Loader strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    Strict,
    Lossy,
    Padded,
}

impl ReadStrategy {
    pub const CHAIN: [Self; 3] = [Self::Strict, Self::Lossy, Self::Padded];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lossy => "lossy",
            Self::Padded => "padded",
        }
    }
}

/// Header row plus string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table; short rows are padded with empty cells, long rows truncated
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Rewrite every cell of a column; returns false if the column is absent
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&str) -> String,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };

        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Load a CSV file through the fallback chain
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let bytes = std::fs::read(path).map_err(|e| TableError::io(path, e))?;
        let mut attempts = Vec::new();

        for strategy in ReadStrategy::CHAIN {
            match Self::parse(&bytes, strategy) {
                Ok((table, skipped)) => {
                    tracing::info!(
                        path = %path.display(),
                        strategy = strategy.as_str(),
                        rows = table.len(),
                        skipped,
                        "Loaded table"
                    );
                    return Ok(table);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        strategy = strategy.as_str(),
                        error = %e,
                        "Table read strategy failed"
                    );
                    attempts.push(format!("{}: {e}", strategy.as_str()));
                }
            }
        }

        Err(TableError::Unreadable {
            path: path.to_path_buf(),
            attempts,
        })
    }

    /// Parse CSV bytes with one strategy; returns the table and skipped row count
    pub fn parse(bytes: &[u8], strategy: ReadStrategy) -> Result<(Self, usize), TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(strategy != ReadStrategy::Strict)
            .from_reader(bytes);

        let headers: Vec<String> = match strategy {
            ReadStrategy::Strict => reader.headers()?.iter().map(str::to_string).collect(),
            _ => reader
                .byte_headers()?
                .iter()
                .map(|h| String::from_utf8_lossy(h).into_owned())
                .collect(),
        };
        let headers = strip_bom(headers);

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(TableError::MissingHeader);
        }

        let width = headers.len();
        let mut rows = Vec::new();
        let mut skipped = 0;

        match strategy {
            ReadStrategy::Strict => {
                for (i, result) in reader.records().enumerate() {
                    match result {
                        Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                        Err(e) if matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                            tracing::warn!(line = i + 2, "Skipping row with wrong field count");
                            skipped += 1;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            ReadStrategy::Lossy | ReadStrategy::Padded => {
                for (i, result) in reader.byte_records().enumerate() {
                    let record = result?;
                    let mut row: Vec<String> = record
                        .iter()
                        .map(|c| String::from_utf8_lossy(c).into_owned())
                        .collect();

                    if row.len() != width {
                        if strategy == ReadStrategy::Lossy {
                            tracing::warn!(
                                line = i + 2,
                                fields = row.len(),
                                expected = width,
                                "Skipping row with wrong field count"
                            );
                            skipped += 1;
                            continue;
                        }
                        row.resize(width, String::new());
                    }
                    rows.push(row);
                }
            }
        }

        Ok((Self { headers, rows }, skipped))
    }

    /// Write the table as UTF-8 CSV, optionally prefixed with a byte-order mark
    pub fn save(&self, path: &Path, with_bom: bool) -> Result<(), TableError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TableError::io(parent, e))?;
        }

        let mut file = File::create(path).map_err(|e| TableError::io(path, e))?;
        if with_bom {
            write!(file, "{BOM}").map_err(|e| TableError::io(path, e))?;
        }

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| TableError::io(path, e))?;

        Ok(())
    }
}

fn strip_bom(mut headers: Vec<String>) -> Vec<String> {
    if let Some(first) = headers.first_mut() {
        if let Some(rest) = first.strip_prefix(BOM) {
            *first = rest.to_string();
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse() {
        let data = "id,name\n1,Analyst\n2,Аналитик\n";
        let (table, skipped) = Table::parse(data.as_bytes(), ReadStrategy::Strict).unwrap();

        assert_eq!(table.headers(), &["id", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(skipped, 0);
        assert_eq!(table.column("name").unwrap(), vec!["Analyst", "Аналитик"]);
    }

    #[test]
    fn test_strict_skips_wrong_width_rows() {
        let data = "id,name\n1,Analyst\n2,Broken,extra\n3,Lead\n";
        let (table, skipped) = Table::parse(data.as_bytes(), ReadStrategy::Strict).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(skipped, 1);
        assert_eq!(table.column("id").unwrap(), vec!["1", "3"]);
    }

    #[test]
    fn test_strict_rejects_invalid_utf8() {
        let mut data = b"id,name\n1,".to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        data.push(b'\n');

        assert!(Table::parse(&data, ReadStrategy::Strict).is_err());

        let (table, _) = Table::parse(&data, ReadStrategy::Lossy).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.rows()[0][1].contains('\u{FFFD}'));
    }

    #[test]
    fn test_padded_keeps_short_rows() {
        let data = "id,name,grade\n1,Analyst\n2,Lead,Senior,extra\n";
        let (table, skipped) = Table::parse(data.as_bytes(), ReadStrategy::Padded).unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(table.rows()[0], vec!["1", "Analyst", ""]);
        assert_eq!(table.rows()[1], vec!["2", "Lead", "Senior"]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let data = "\u{FEFF}id,name\n1,Analyst\n";
        let (table, _) = Table::parse(data.as_bytes(), ReadStrategy::Strict).unwrap();
        assert_eq!(table.column_index("id"), Some(0));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(Table::parse(b"", ReadStrategy::Strict).is_err());
    }

    #[test]
    fn test_new_fits_rows_to_header() {
        let mut table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec!["x".to_string()],
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
            ],
        );

        assert_eq!(table.rows()[0], vec!["x", ""]);
        assert_eq!(table.rows()[1], vec!["1", "2"]);
        assert_eq!(table.column("b").unwrap(), vec!["", "2"]);
        assert!(table.map_column("b", |v| format!("{v}!")));
        assert_eq!(table.column("b").unwrap(), vec!["!", "2!"]);
    }

    #[test]
    fn test_map_column() {
        let mut table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["x".to_string(), "y".to_string()]],
        );

        assert!(table.map_column("b", |v| v.to_uppercase()));
        assert!(!table.map_column("missing", |v| v.to_string()));
        assert_eq!(table.rows()[0], vec!["x", "Y"]);
    }
}
