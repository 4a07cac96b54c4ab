//! Tests for config loading from file and environment

use hh_harvest::config::{Config, SearchQuery};
use serial_test::serial;
use std::path::Path;

const ENV_KEYS: &[&str] = &[
    "HH_BASE_URL",
    "HH_PER_PAGE",
    "HH_MIN_INTERVAL_MS",
    "HH_MAX_BLOCKED_RETRIES",
    "HH_OUTPUT_DIR",
    "HH_LOG_FORMAT",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_config_file_exists() {
    let config_path = Path::new("config.toml");
    assert!(
        config_path.exists(),
        "config.toml should exist in project root"
    );
}

#[test]
#[serial]
fn test_config_toml_loads() {
    clear_env();
    let config = Config::load(Some(Path::new("config.toml"))).expect("config.toml should load");

    assert_eq!(config.api.base_url, "https://api.hh.ru/vacancies");
    assert_eq!(config.api.search_fields, vec!["name", "company_name"]);
    assert_eq!(config.fetcher.min_interval_ms, 500);
    assert_eq!(config.fetcher.blocked_cooldown_ms, 10_000);
    assert_eq!(config.fetcher.max_blocked_retries, None);
    assert_eq!(config.collector.queries.len(), 4);
    assert_eq!(
        config.collector.queries[0],
        SearchQuery::with_slug("Аналитик данных", "data_analyst")
    );
    assert_eq!(config.normalizer.markup_column.as_deref(), Some("description"));
}

#[test]
#[serial]
fn test_config_toml_matches_defaults() {
    clear_env();
    let from_file = Config::load(Some(Path::new("config.toml"))).unwrap();
    let defaults = Config::default();

    assert_eq!(from_file.collector.queries, defaults.collector.queries);
    assert_eq!(from_file.normalizer.list_columns, defaults.normalizer.list_columns);
    assert_eq!(from_file.output.dir, defaults.output.dir);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    std::env::set_var("HH_BASE_URL", "http://127.0.0.1:9999/vacancies");
    std::env::set_var("HH_PER_PAGE", "20");
    std::env::set_var("HH_MAX_BLOCKED_RETRIES", "3");
    std::env::set_var("HH_OUTPUT_DIR", "/tmp/hh");

    let config = Config::load(Some(Path::new("config.toml"))).unwrap();
    clear_env();

    assert_eq!(config.api.base_url, "http://127.0.0.1:9999/vacancies");
    assert_eq!(config.api.per_page, 20);
    assert_eq!(config.fetcher.max_blocked_retries, Some(3));
    assert_eq!(config.output.dir, Path::new("/tmp/hh"));
}

#[test]
#[serial]
fn test_unparseable_env_value_is_ignored() {
    clear_env();
    std::env::set_var("HH_MIN_INTERVAL_MS", "soon");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.fetcher.min_interval_ms, 500);
}

#[test]
#[serial]
fn test_invalid_env_fails_validation() {
    clear_env();
    std::env::set_var("HH_PER_PAGE", "0");

    let result = Config::load(None);
    clear_env();

    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_error() {
    assert!(Config::from_file(Path::new("does-not-exist.toml")).is_err());
}
