//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Sanitize filename by removing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

    let re =
        INVALID_CHARS.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex pattern"));

    re.replace_all(filename, "_").to_string()
}

/// Turn a free-text search query into a file name stem
///
/// Lower-cases, replaces path-unsafe characters and whitespace runs with `_`.
/// Non-Latin scripts are kept as they are.
pub fn query_slug(query: &str) -> String {
    let cleaned = sanitize_filename(&normalize_whitespace(query).to_lowercase());
    let slug = cleaned.replace(' ', "_");

    if slug.is_empty() {
        String::from("query")
    } else {
        slug
    }
}

/// Sibling path marked as cleaned: `dir/name.csv` -> `dir/name_cleaned.csv`
pub fn cleaned_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{stem}_cleaned.{}", ext.to_string_lossy()),
        None => format!("{stem}_cleaned"),
    };

    input.with_file_name(file_name)
}
