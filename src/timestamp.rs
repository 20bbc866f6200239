//! Leading timestamp detection for log lines and `--since`/`--until` values
//!
//! Server logs prefix each record with `YYYY-MM-DD HH:MM:SS`, optionally
//! followed by `,mmm` or `.mmm` milliseconds. Most lines of a traceback carry
//! no timestamp, so every parser here returns `Option` and treats absence as
//! a normal outcome.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Fixed-width timestamp prefix at the start of a line
static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(?:[,.]\d{3})?)").unwrap()
});

/// Formats tried in order against the matched prefix; first success wins
pub const LINE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S,%3f",
    "%Y-%m-%d %H:%M:%S.%3f",
    "%Y-%m-%d %H:%M:%S",
];

/// Check whether a line starts with something shaped like a timestamp
///
/// This is a pattern check only; `2024-13-45 99:00:00` still counts as a
/// prefix even though it cannot be parsed.
pub fn has_timestamp_prefix(line: &str) -> bool {
    TIMESTAMP_PREFIX.is_match(line)
}

/// Parse the leading timestamp of a log line
pub fn parse_line_timestamp(line: &str) -> Option<NaiveDateTime> {
    let raw = TIMESTAMP_PREFIX.captures(line)?.get(1)?.as_str();

    LINE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a user-supplied time boundary
///
/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight). Returns
/// `None` on anything else; the caller decides whether that is an error.
pub fn parse_boundary(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
