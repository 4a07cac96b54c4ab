//! hh_harvest - Job vacancy harvester for the hh.ru public API
//!
//! Collects analyst vacancies for a set of search queries, derives skills,
//! seniority grade and salary bucket for each one, and writes the results as
//! CSV tables. A separate cleaning pass flattens list columns and strips
//! markup for downstream analysis.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Paced fetching, search pagination and the dataset pipeline
//! - [`parser`] - Field extraction, vocabularies and text cleanup
//! - [`models`] - API records, derived fields and output rows
//! - [`storage`] - CSV tables and dataset files
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use hh_harvest::config::Config;
//! use hh_harvest::crawler::{DatasetBuilder, RateLimitedFetcher, VacancyCollector};
//! use hh_harvest::parser::FieldExtractor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = RateLimitedFetcher::new(&config.api, config.fetcher.clone())?;
//!     let mut collector = VacancyCollector::new(fetcher, config.api.clone(), &config.collector);
//!
//!     let texts: Vec<&str> = config.collector.queries.iter().map(|q| q.text.as_str()).collect();
//!     let dataset = DatasetBuilder::new(FieldExtractor::default())
//!         .build(&mut collector, &texts)
//!         .await;
//!     println!("{} vacancies", dataset.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, SearchQuery};
    pub use crate::crawler::{DatasetBuilder, RateLimitedFetcher, VacancyCollector, VacancySource};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Dataset, EnrichedRecord, Grade, SalaryBin, VacancyDetail};
    pub use crate::parser::{FieldExtractor, TextNormalizer, Vocabulary};
    pub use crate::storage::{DatasetWriter, Table};
}

pub use models::{Dataset, EnrichedRecord, Grade, SalaryBin};
