//! Cell-level text cleaning rules
//!
//! These functions flatten serialized list cells and strip markup from
//! free-text cells. They work on single values; the table-wide pass lives in
//! [`crate::parser::normalizer`].

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::normalize_whitespace;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Characters removed from serialized list cells
const LIST_SYNTAX: &[char] = &['[', ']', '\'', '"'];

/// Values that mean "no list at all"
const EMPTY_SENTINELS: &[&str] = &["", "[]"];

/// Flatten a serialized list cell into a comma-joined string
///
/// Missing values and the empty sentinels (`""`, `"[]"`) become `""`.
/// Otherwise list brackets and quote characters are removed, whitespace runs
/// collapse to one space and the ends are trimmed. The result is a readable
/// string, not a re-parsed list.
///
/// # Examples
///
/// ```
/// use hh_harvest::parser::sanitize::flatten_list_cell;
///
/// assert_eq!(flatten_list_cell(Some("['sql', 'excel']")), "sql, excel");
/// assert_eq!(flatten_list_cell(Some("[]")), "");
/// assert_eq!(flatten_list_cell(None), "");
/// ```
pub fn flatten_list_cell(value: Option<&str>) -> String {
    let value = match value {
        Some(v) if !EMPTY_SENTINELS.contains(&v) => v,
        _ => return String::new(),
    };

    let stripped: String = value.chars().filter(|c| !LIST_SYNTAX.contains(c)).collect();
    normalize_whitespace(&stripped)
}

/// Remove markup tags from a free-text cell
///
/// Anything matching `<...>` is dropped, whitespace runs collapse to one
/// space and the ends are trimmed. Entities such as `&nbsp;` are kept as-is.
///
/// # Examples
///
/// ```
/// use hh_harvest::parser::sanitize::strip_markup;
///
/// assert_eq!(strip_markup(Some("<p>Hello&nbsp;world</p>")), "Hello&nbsp;world");
/// assert_eq!(strip_markup(None), "");
/// ```
pub fn strip_markup(text: Option<&str>) -> String {
    match text {
        Some(t) => normalize_whitespace(&strip_html_tags(t)),
        None => String::new(),
    }
}

/// Extract plain text from HTML, removing all tags
///
/// # Examples
///
/// ```
/// use hh_harvest::parser::sanitize::strip_html_tags;
///
/// let html = "<p>Hello <strong>World</strong></p>";
/// let plain = strip_html_tags(html);
/// assert_eq!(plain, "Hello World");
/// ```
pub fn strip_html_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_list_cell() {
        assert_eq!(flatten_list_cell(Some("['sql', 'excel']")), "sql, excel");
        assert_eq!(
            flatten_list_cell(Some("[\"Power BI\",   'Tableau']")),
            "Power BI, Tableau"
        );
    }

    #[test]
    fn test_flatten_sentinels() {
        assert_eq!(flatten_list_cell(Some("")), "");
        assert_eq!(flatten_list_cell(Some("[]")), "");
        assert_eq!(flatten_list_cell(None), "");
    }

    #[test]
    fn test_flatten_plain_value_only_collapses_whitespace() {
        assert_eq!(flatten_list_cell(Some("  sql,\n excel ")), "sql, excel");
    }

    #[test]
    fn test_flatten_cyrillic() {
        assert_eq!(
            flatten_list_cell(Some("['анализ данных', 'коммуникация']")),
            "анализ данных, коммуникация"
        );
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup(Some("<p>Hello&nbsp;world</p>")),
            "Hello&nbsp;world"
        );
        assert_eq!(
            strip_markup(Some("<ul>\n  <li>SQL</li>\n  <li>Python</li>\n</ul>")),
            "SQL Python"
        );
    }

    #[test]
    fn test_strip_markup_empty() {
        assert_eq!(strip_markup(None), "");
        assert_eq!(strip_markup(Some("   ")), "");
    }

    #[test]
    fn test_strip_html_nested_tags() {
        let html = "<div><p>Para <span>with <em>nested</em> tags</span></p></div>";
        let plain = strip_html_tags(html);
        assert_eq!(plain, "Para with nested tags");
    }
}
