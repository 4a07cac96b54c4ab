//! Configuration management for the vacancy harvester
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Every section has defaults, so a file only needs
//! the keys it changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::utils::query_slug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream API configuration
    pub api: ApiConfig,

    /// Request pacing and retry configuration
    pub fetcher: FetcherConfig,

    /// Search queries and pagination pacing
    pub collector: CollectorConfig,

    /// Output location
    pub output: OutputConfig,

    /// Column lists for the cleaning pass
    pub normalizer: NormalizerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Search endpoint; details live at `{base_url}/{id}`
    pub base_url: String,

    /// Results per search page
    pub per_page: u32,

    /// Response locale
    pub locale: String,

    /// Fields the free-text query is matched against
    pub search_fields: Vec<String>,

    /// User agent string
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Request pacing and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Minimum gap between the end of one request and the start of the next
    pub min_interval_ms: u64,

    /// Pause after the server answers with a rate-limited status
    pub blocked_cooldown_ms: u64,

    /// Pause after a transport error carrying a rate-limited status
    pub transport_blocked_cooldown_ms: u64,

    /// Cap on rate-limit retries per request; unbounded when unset
    pub max_blocked_retries: Option<u32>,

    /// Ceiling in requests per second, applied before the spacing floor
    pub rate_limit: u32,
}

/// One seed search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query sent to the API and stored in `search_query`
    pub text: String,

    /// Output file stem; derived from `text` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            slug: None,
        }
    }

    pub fn with_slug(text: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            slug: Some(slug.into()),
        }
    }

    /// File stem for this query's partition
    pub fn file_stem(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => query_slug(slug),
            _ => query_slug(&self.text),
        }
    }
}

/// Search queries and pagination pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Lower bound of the random pause between search pages
    pub page_delay_min_ms: u64,

    /// Upper bound of the random pause between search pages
    pub page_delay_max_ms: u64,

    /// Seed queries, in collection order
    pub queries: Vec<SearchQuery>,

    /// Vocabulary TOML replacing the built-in keyword lists
    pub vocabulary_path: Option<PathBuf>,
}

/// Output location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the CSV files
    pub dir: PathBuf,
}

/// Column lists for the cleaning pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Columns holding serialized lists
    pub list_columns: Vec<String>,

    /// Column holding markup
    pub markup_column: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.hh.ru/vacancies"),
            per_page: 100,
            locale: String::from("RU"),
            search_fields: vec![String::from("name"), String::from("company_name")],
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
            request_timeout_secs: 30,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 500,
            blocked_cooldown_ms: 10_000,
            transport_blocked_cooldown_ms: 30_000,
            max_blocked_retries: None,
            rate_limit: 2,
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_delay_min_ms: 300,
            page_delay_max_ms: 1000,
            queries: vec![
                SearchQuery::with_slug("Аналитик данных", "data_analyst"),
                SearchQuery::with_slug("Системный аналитик", "system_analyst"),
                SearchQuery::with_slug("Бизнес-аналитик", "business_analyst"),
                SearchQuery::with_slug("Продуктовый аналитик", "product_analyst"),
            ],
            vocabulary_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            list_columns: vec![
                String::from("key_skills"),
                String::from("key_skills_from_key_skills_field"),
                String::from("hard_skills_from_description"),
                String::from("soft_skills_from_description"),
            ],
            markup_column: Some(String::from("description")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an optional file, then apply `HH_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Override individual values from `HH_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("HH_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = env_parse("HH_PER_PAGE") {
            self.api.per_page = v;
        }
        if let Ok(v) = std::env::var("HH_USER_AGENT") {
            self.api.user_agent = v;
        }
        if let Some(v) = env_parse("HH_REQUEST_TIMEOUT") {
            self.api.request_timeout_secs = v;
        }
        if let Some(v) = env_parse("HH_MIN_INTERVAL_MS") {
            self.fetcher.min_interval_ms = v;
        }
        if let Some(v) = env_parse("HH_MAX_BLOCKED_RETRIES") {
            self.fetcher.max_blocked_retries = Some(v);
        }
        if let Some(v) = env_parse("HH_RATE_LIMIT") {
            self.fetcher.rate_limit = v;
        }
        if let Ok(v) = std::env::var("HH_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("HH_VOCABULARY") {
            self.collector.vocabulary_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("HH_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("HH_LOG_FORMAT") {
            self.logging.format = v;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.api.base_url))?;

        if self.api.per_page == 0 {
            anyhow::bail!("per_page must be greater than 0");
        }

        if self.fetcher.rate_limit == 0 {
            anyhow::bail!("rate_limit must be positive");
        }

        if self.collector.page_delay_min_ms > self.collector.page_delay_max_ms {
            anyhow::bail!("page_delay_min_ms must not exceed page_delay_max_ms");
        }

        if self.collector.queries.is_empty() {
            anyhow::bail!("at least one search query is required");
        }

        if self.collector.queries.iter().any(|q| q.text.trim().is_empty()) {
            anyhow::bail!("search query text must not be empty");
        }

        Ok(())
    }
}

impl ApiConfig {
    /// HTTP client timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl FetcherConfig {
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    #[must_use]
    pub fn blocked_cooldown(&self) -> Duration {
        Duration::from_millis(self.blocked_cooldown_ms)
    }

    #[must_use]
    pub fn transport_blocked_cooldown(&self) -> Duration {
        Duration::from_millis(self.transport_blocked_cooldown_ms)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
