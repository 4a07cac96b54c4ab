//! Persistence of collected datasets as delimited files
//!
//! The collector writes one CSV per search query plus a combined file; the
//! cleaning tool reads any of them back through [`table::Table`].

pub mod table;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::SearchQuery;
use crate::models::{Dataset, EnrichedRecord};
use crate::utils::error::TableError;

pub use table::{ReadStrategy, Table};

/// Stem of the combined output file
pub const COMBINED_STEM: &str = "all_vacancies";

/// One written file and its row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes a dataset as per-query files plus one combined file
///
/// File names are `{slug}_{YYYYMMDD}.csv`. Output is UTF-8 with a
/// byte-order mark so spreadsheet tools pick the right encoding for
/// non-Latin text.
pub struct DatasetWriter {
    output_dir: PathBuf,
    date_stamp: String,
}

impl DatasetWriter {
    /// Create a writer stamping files with `date`
    pub fn new(output_dir: &Path, date: NaiveDate) -> Result<Self, TableError> {
        std::fs::create_dir_all(output_dir).map_err(|e| TableError::io(output_dir, e))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            date_stamp: date.format("%Y%m%d").to_string(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path for a file stem, e.g. `data/all_vacancies_20240101.csv`
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}_{}.csv", self.date_stamp))
    }

    /// Write every query partition, then the combined file
    pub fn write(
        &self,
        dataset: &Dataset,
        queries: &[SearchQuery],
    ) -> Result<Vec<WrittenFile>, TableError> {
        let mut written = Vec::with_capacity(queries.len() + 1);

        for query in queries {
            let rows = dataset.partition(&query.text);
            let path = self.path_for(&query.file_stem());
            write_records(&path, rows.iter().copied())?;

            tracing::info!(
                query = %query.text,
                path = %path.display(),
                rows = rows.len(),
                "Wrote query partition"
            );
            written.push(WrittenFile {
                path,
                rows: rows.len(),
            });
        }

        let path = self.path_for(COMBINED_STEM);
        write_records(&path, dataset.records().iter())?;
        tracing::info!(path = %path.display(), rows = dataset.len(), "Wrote combined dataset");
        written.push(WrittenFile {
            path,
            rows: dataset.len(),
        });

        Ok(written)
    }
}

/// Write records with a header row, even when there are no records
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<(), TableError>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let mut file = File::create(path).map_err(|e| TableError::io(path, e))?;
    write!(file, "\u{FEFF}").map_err(|e| TableError::io(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(EnrichedRecord::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| TableError::io(path, e))?;

    Ok(())
}
