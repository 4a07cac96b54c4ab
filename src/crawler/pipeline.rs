//! Multi-query enrichment pipeline
//!
//! ```text
//! for each query ──▶ collect summaries ──▶ detail per summary ──▶ extract ──▶ Dataset
//!                                               │
//!                                         None: skip row
//! ```
//!
//! Queries run in order, summaries in collection order. A vacancy found by
//! several queries yields one row per query; rows are never deduplicated
//! across queries.
//!
//! # Example
//!
//! ```no_run
//! use hh_harvest::config::Config;
//! use hh_harvest::crawler::collector::VacancyCollector;
//! use hh_harvest::crawler::fetcher::RateLimitedFetcher;
//! use hh_harvest::crawler::pipeline::DatasetBuilder;
//! use hh_harvest::parser::FieldExtractor;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let fetcher = RateLimitedFetcher::new(&config.api, config.fetcher.clone())?;
//! let mut collector = VacancyCollector::new(fetcher, config.api.clone(), &config.collector);
//!
//! let mut builder = DatasetBuilder::new(FieldExtractor::default());
//! let dataset = builder.build(&mut collector, &["Data Analyst"]).await;
//!
//! println!("Collected {} rows", dataset.len());
//! # Ok(())
//! # }
//! ```

use crate::crawler::collector::VacancySource;
use crate::models::{Dataset, EnrichedRecord};
use crate::parser::FieldExtractor;

/// Counters for one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Summaries returned by search, over all queries
    pub summaries: usize,

    /// Rows appended to the dataset
    pub records: usize,

    /// Summaries dropped because their detail was unavailable
    pub skipped_details: usize,

    /// Summaries dropped because search returned no id
    pub missing_ids: usize,
}

/// Drives a [`VacancySource`] over the seed queries and assembles rows
pub struct DatasetBuilder {
    extractor: FieldExtractor,
    stats: BuildStats,
}

impl DatasetBuilder {
    #[must_use]
    pub fn new(extractor: FieldExtractor) -> Self {
        Self {
            extractor,
            stats: BuildStats::default(),
        }
    }

    /// Counters accumulated by the last call to [`DatasetBuilder::build`]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Collect, resolve and enrich every vacancy for each query in order
    pub async fn build<S, Q>(&mut self, source: &mut S, queries: &[Q]) -> Dataset
    where
        S: VacancySource + ?Sized,
        Q: AsRef<str>,
    {
        self.stats = BuildStats::default();
        let mut dataset = Dataset::new();

        for query in queries {
            let query = query.as_ref();
            tracing::info!(query, "Collecting vacancies");

            let summaries = source.collect(query).await;
            let total = summaries.len();
            self.stats.summaries += total;
            tracing::info!(query, found = total, "Search finished");

            for (i, summary) in summaries.into_iter().enumerate() {
                tracing::info!(
                    query,
                    index = i + 1,
                    total,
                    name = summary.name.as_deref().unwrap_or("unknown"),
                    employer = summary.employer_name().unwrap_or("unknown"),
                    "Processing vacancy"
                );

                let Some(summary_id) = summary.id else {
                    tracing::warn!(query, "Search result without id, skipping");
                    self.stats.missing_ids += 1;
                    continue;
                };

                let Some(detail) = source.get_detail(&summary_id).await else {
                    tracing::warn!(query, id = %summary_id, "No detail available, skipping");
                    self.stats.skipped_details += 1;
                    continue;
                };

                let derived = self.extractor.extract(&detail);
                let id = detail
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or(summary_id);

                dataset.push(EnrichedRecord::assemble(id, detail, derived, query));
                self.stats.records += 1;
            }
        }

        tracing::info!(
            rows = self.stats.records,
            skipped = self.stats.skipped_details,
            "Dataset assembled"
        );
        dataset
    }
}
