//! Common test utilities

#![allow(dead_code)]

use hh_harvest::config::{ApiConfig, CollectorConfig, FetcherConfig};
use hh_harvest::crawler::{RateLimitedFetcher, VacancyCollector};
use serde_json::{json, Value};

/// API config pointed at a mock server
pub fn test_api(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Default::default()
    }
}

/// Fetcher config with pacing short enough for tests
pub fn fast_fetcher() -> FetcherConfig {
    FetcherConfig {
        min_interval_ms: 10,
        blocked_cooldown_ms: 20,
        transport_blocked_cooldown_ms: 20,
        max_blocked_retries: Some(5),
        rate_limit: 1000,
    }
}

pub fn fast_collector_config() -> CollectorConfig {
    CollectorConfig {
        page_delay_min_ms: 0,
        page_delay_max_ms: 5,
        ..Default::default()
    }
}

/// Collector against `{server}/vacancies` with fast pacing
pub fn test_collector(server_uri: &str) -> VacancyCollector {
    let api = test_api(&format!("{server_uri}/vacancies"));
    let fetcher = RateLimitedFetcher::new(&api, fast_fetcher()).unwrap();
    VacancyCollector::new(fetcher, api, &fast_collector_config())
}

/// Search page body with the given ids
pub fn search_page(ids: &[&str], pages: u32) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Аналитик {id}"),
                "employer": {"id": "1", "name": "Компания"}
            })
        })
        .collect();

    json!({
        "items": items,
        "found": ids.len(),
        "pages": pages,
        "per_page": 100,
        "page": 0
    })
}

/// Detail body for one vacancy
pub fn vacancy_detail(id: &str, experience: &str, salary_from: Option<u64>) -> Value {
    json!({
        "id": id,
        "name": "Аналитик данных",
        "published_at": "2024-03-01T10:00:00+0300",
        "alternate_url": format!("https://hh.ru/vacancy/{id}"),
        "type": {"id": "open", "name": "Открытая"},
        "employer": {"id": "42", "name": "Компания"},
        "department": null,
        "area": {"id": "1", "name": "Москва"},
        "experience": {"id": experience, "name": "опыт"},
        "key_skills": [{"name": "SQL"}, {"name": "Python"}],
        "schedule": {"id": "remote", "name": "Удаленная работа"},
        "employment": {"id": "full", "name": "Полная занятость"},
        "description": "<p>Требуется знание <strong>SQL</strong> и Excel, коммуникация с заказчиком</p>",
        "salary": salary_from.map(|from| json!({"from": from, "to": null, "currency": "RUR"}))
    })
}
