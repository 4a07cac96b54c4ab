//! Search pagination and vacancy detail lookup
//!
//! [`VacancyCollector`] walks the search endpoint page by page for one query
//! and fetches full records by id. Failures never escape: a failed page ends
//! pagination with what was gathered so far, a failed detail is `None`.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use crate::config::{ApiConfig, CollectorConfig};
use crate::crawler::fetcher::RateLimitedFetcher;
use crate::models::{SearchPage, VacancyDetail, VacancySummary};
use crate::utils::error::FetchError;

/// Anything that can list vacancies for a query and resolve their details
#[async_trait]
pub trait VacancySource: Send {
    /// All summaries for a query; partial or empty on failure
    async fn collect(&mut self, search_text: &str) -> Vec<VacancySummary>;

    /// Full record for an id; `None` when unavailable
    async fn get_detail(&mut self, id: &str) -> Option<VacancyDetail>;
}

/// Collector backed by the vacancies HTTP API
pub struct VacancyCollector {
    fetcher: RateLimitedFetcher,
    api: ApiConfig,
    page_delay: (Duration, Duration),
}

impl VacancyCollector {
    /// Create a collector around a fetcher
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hh_harvest::config::Config;
    /// use hh_harvest::crawler::collector::VacancyCollector;
    /// use hh_harvest::crawler::fetcher::RateLimitedFetcher;
    ///
    /// let config = Config::default();
    /// let fetcher = RateLimitedFetcher::new(&config.api, config.fetcher.clone()).unwrap();
    /// let collector = VacancyCollector::new(fetcher, config.api.clone(), &config.collector);
    /// ```
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher, api: ApiConfig, collector: &CollectorConfig) -> Self {
        let min = Duration::from_millis(collector.page_delay_min_ms);
        let max = Duration::from_millis(collector.page_delay_max_ms.max(collector.page_delay_min_ms));

        Self {
            fetcher,
            api,
            page_delay: (min, max),
        }
    }

    pub fn fetcher(&self) -> &RateLimitedFetcher {
        &self.fetcher
    }

    /// Fetch and parse one search page
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure or malformed JSON
    pub async fn fetch_page(
        &mut self,
        search_text: &str,
        page: u32,
    ) -> Result<SearchPage, FetchError> {
        let params = self.search_params(search_text, page);
        let body = self.fetcher.fetch(&self.api.base_url, &params).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch and parse one vacancy by id
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure or malformed JSON, and
    /// `FetchError::EmptyRecord` when the body has neither id nor name
    pub async fn fetch_detail(&mut self, id: &str) -> Result<VacancyDetail, FetchError> {
        let url = detail_url(&self.api.base_url, id);
        let body = self.fetcher.fetch(&url, &[]).await?;
        let detail: VacancyDetail = serde_json::from_str(&body)?;

        if detail.is_empty() {
            return Err(FetchError::EmptyRecord);
        }
        Ok(detail)
    }

    /// Query parameters for a search page
    ///
    /// `search_field` is repeated once per configured field.
    pub fn search_params(&self, search_text: &str, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("text", search_text.to_string()),
            ("page", page.to_string()),
            ("per_page", self.api.per_page.to_string()),
            ("locale", self.api.locale.clone()),
        ];
        params.extend(
            self.api
                .search_fields
                .iter()
                .map(|f| ("search_field", f.clone())),
        );
        params
    }

    /// Random pause between pages, uniform over the configured bounds
    fn page_delay(&self) -> Duration {
        let (min, max) = self.page_delay;
        if min == max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

#[async_trait]
impl VacancySource for VacancyCollector {
    async fn collect(&mut self, search_text: &str) -> Vec<VacancySummary> {
        let mut summaries = Vec::new();
        let mut page = 0;

        loop {
            let result = match self.fetch_page(search_text, page).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(
                        query = search_text,
                        page,
                        error = %e,
                        "Search page unavailable, keeping partial results"
                    );
                    break;
                }
            };

            if result.items.is_empty() {
                tracing::info!(query = search_text, page, "No more vacancies");
                break;
            }

            let count = result.items.len();
            summaries.extend(result.items);
            tracing::info!(
                query = search_text,
                page = page + 1,
                collected = count,
                total = summaries.len(),
                "Collected search page"
            );

            if page + 1 >= result.pages {
                tracing::info!(query = search_text, pages = result.pages, "All pages processed");
                break;
            }

            page += 1;
            let delay = self.page_delay();
            tokio::time::sleep(delay).await;
        }

        summaries
    }

    async fn get_detail(&mut self, id: &str) -> Option<VacancyDetail> {
        match self.fetch_detail(id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::warn!(id, error = %e, "Vacancy detail unavailable");
                None
            }
        }
    }
}

/// `{base}/{id}`, tolerating a trailing slash on the base
pub fn detail_url(base_url: &str, id: &str) -> String {
    format!("{}/{id}", base_url.trim_end_matches('/'))
}
