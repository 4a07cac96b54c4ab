//! HTTP fetcher with request pacing and rate-limit retry
//!
//! This module provides the fetcher used for every call to the vacancies
//! API, with features including:
//! - A minimum gap between the end of one request and the start of the next
//! - An optional requests-per-second ceiling with governor
//! - Fixed-cooldown retry of the same request while the server rate limits
//! - Browser-like default headers and a cookie store

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client, StatusCode,
};
use std::num::NonZeroU32;
use tokio::time::Instant;

use crate::config::{ApiConfig, FetcherConfig};
use crate::utils::error::FetchError;

/// Status the API answers with when it throttles a client
pub const BLOCKED_STATUS: StatusCode = StatusCode::FORBIDDEN;

/// Outcome of a single attempt
#[derive(Debug)]
enum Attempt {
    Done(String),
    Blocked,
    TransportBlocked,
}

/// Vacancies API fetcher with pacing and rate-limit retry
///
/// Pacing state (request counter and time of the last request) belongs to
/// the instance. Calls take `&mut self`, so one fetcher serves one logical
/// thread of control and requests never overlap.
pub struct RateLimitedFetcher {
    /// HTTP client with configured timeout, cookies and compression
    client: Client,

    /// Requests-per-second ceiling
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Pacing and retry settings
    config: FetcherConfig,

    /// Completed request attempts
    request_count: u64,

    /// When the previous attempt finished
    last_request: Option<Instant>,
}

impl RateLimitedFetcher {
    /// Create a fetcher from the API and fetcher configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(api: &ApiConfig, config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&api.user_agent)
            .default_headers(default_headers())
            .timeout(api.request_timeout())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            config,
            request_count: 0,
            last_request: None,
        })
    }

    /// Number of request attempts made so far
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// GET `url` with query parameters and return the response body
    ///
    /// While the server answers with the rate-limited status, sleeps for the
    /// configured cooldown and repeats the same request. This is unbounded
    /// unless `max_blocked_retries` is set.
    ///
    /// # Errors
    ///
    /// - `FetchError::ServerError` for any other non-success status
    /// - `FetchError::Http` / `FetchError::Timeout` for transport failures
    /// - `FetchError::MaxRetriesExceeded` when the retry cap is hit
    ///
    /// Callers treat every error as "no response" for this unit of work.
    pub async fn fetch(
        &mut self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let mut blocked_retries: u32 = 0;

        loop {
            let cooldown = match self.attempt(url, query).await? {
                Attempt::Done(body) => return Ok(body),
                Attempt::Blocked => {
                    tracing::warn!(
                        url,
                        cooldown_ms = self.config.blocked_cooldown_ms,
                        "Rate limited, pausing before retry"
                    );
                    self.config.blocked_cooldown()
                }
                Attempt::TransportBlocked => {
                    tracing::warn!(
                        url,
                        cooldown_ms = self.config.transport_blocked_cooldown_ms,
                        "Rate limited at transport level, pausing before retry"
                    );
                    self.config.transport_blocked_cooldown()
                }
            };

            if let Some(max) = self.config.max_blocked_retries {
                if blocked_retries >= max {
                    tracing::error!(url, retries = blocked_retries, "Giving up on rate-limited request");
                    return Err(FetchError::MaxRetriesExceeded);
                }
            }
            blocked_retries += 1;

            tokio::time::sleep(cooldown).await;
        }
    }

    /// One paced request
    async fn attempt(&mut self, url: &str, query: &[(&str, String)]) -> Result<Attempt, FetchError> {
        self.rate_limiter.until_ready().await;
        self.wait_for_spacing().await;

        tracing::debug!(url, request = self.request_count + 1, "Sending request");
        let result = self.client.get(url).query(query).send().await;

        let outcome = match result {
            Ok(response) if response.status() == BLOCKED_STATUS => Ok(Attempt::Blocked),
            Ok(response) => match response.error_for_status() {
                Ok(response) => response.text().await.map(Attempt::Done).map_err(classify),
                Err(e) => Err(classify(e)),
            },
            Err(e) => Err(classify(e)),
        };

        self.request_count += 1;
        self.last_request = Some(Instant::now());

        let outcome = route_blocked_error(outcome);
        if let Err(e) = &outcome {
            tracing::warn!(url, error = %e, "Request failed");
        }
        outcome
    }

    /// Sleep until the minimum interval since the last request has passed
    async fn wait_for_spacing(&self) {
        if let Some(last) = self.last_request {
            let next_allowed = last + self.config.min_interval();
            if Instant::now() < next_allowed {
                tokio::time::sleep_until(next_allowed).await;
            }
        }
    }
}

/// Turn an error carrying the rate-limited status into a retryable outcome
///
/// reqwest hands a 403 back as a response, which `attempt` matches first as
/// `Attempt::Blocked`. This path only fires when a 403 surfaces as an error,
/// e.g. while reading the body after `error_for_status`.
fn route_blocked_error(outcome: Result<Attempt, FetchError>) -> Result<Attempt, FetchError> {
    match outcome {
        Err(e) if e.status() == Some(BLOCKED_STATUS.as_u16()) => Ok(Attempt::TransportBlocked),
        other => other,
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::ServerError(status.as_u16())
    } else {
        FetchError::Http(e)
    }
}

/// Headers a browser session would send to the JSON API
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers
}
