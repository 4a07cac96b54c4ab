//! Vacancy collection with request pacing
//!
//! This module implements the network side of the harvester: a paced HTTP
//! fetcher, the search/detail collector built on it, and the multi-query
//! pipeline that turns search results into enriched rows.

pub mod collector;
pub mod fetcher;
pub mod pipeline;

pub use collector::{VacancyCollector, VacancySource};
pub use fetcher::RateLimitedFetcher;
pub use pipeline::{BuildStats, DatasetBuilder};
