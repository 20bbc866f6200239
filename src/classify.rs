//! Exception classification for failure blocks
//!
//! The last non-blank line of a Python traceback names the exception and
//! carries its message, e.g. `psycopg2.errors.UniqueViolation: duplicate key`.

use crate::extract::FailureBlock;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Kind assigned when the terminal line is not `Kind: message` shaped
pub const UNKNOWN_EXCEPTION: &str = "UnknownException";

/// Trailing block lines kept as the example snippet
pub const SNIPPET_LINES: usize = 20;

/// Dotted identifier, optionally followed by `: message`
static TERMINAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_.]*)(?::\s*(.*))?$").unwrap()
});

/// One classified failure, derived from exactly one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub exception_kind: String,
    pub message: String,
    pub timestamp: Option<NaiveDateTime>,
    /// Last lines of the block joined with `\n`
    pub snippet: String,
}

/// Split a terminal line into exception kind and message
pub fn split_terminal_line(line: &str) -> (String, String) {
    let line = line.trim();

    match TERMINAL_LINE.captures(line) {
        Some(caps) => {
            let kind = caps[1].to_string();
            let message = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            (kind, message)
        }
        None => (UNKNOWN_EXCEPTION.to_string(), line.to_string()),
    }
}

/// Classify a block by its last non-blank line
pub fn classify_block(block: &FailureBlock) -> ClassifiedRecord {
    let terminal = block
        .lines
        .iter()
        .rev()
        .map(|l| l.text.as_str())
        .find(|text| !text.trim().is_empty())
        .unwrap_or("");

    let (exception_kind, message) = split_terminal_line(terminal);

    let skip = block.lines.len().saturating_sub(SNIPPET_LINES);
    let snippet = block.lines[skip..]
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    ClassifiedRecord {
        exception_kind,
        message,
        timestamp: block.timestamp,
        snippet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LogLine;

    fn block(lines: &[&str]) -> FailureBlock {
        FailureBlock {
            lines: lines
                .iter()
                .enumerate()
                .map(|(index, text)| LogLine {
                    index,
                    text: text.to_string(),
                })
                .collect(),
            timestamp: None,
        }
    }

    #[test]
    fn test_dotted_kind_with_message() {
        let (kind, msg) = split_terminal_line(
            "psycopg2.errors.UniqueViolation: duplicate key value violates unique constraint \"x\"",
        );
        assert_eq!(kind, "psycopg2.errors.UniqueViolation");
        assert_eq!(msg, "duplicate key value violates unique constraint \"x\"");
    }

    #[test]
    fn test_kind_without_message() {
        let (kind, msg) = split_terminal_line("StopIteration");
        assert_eq!(kind, "StopIteration");
        assert_eq!(msg, "");
    }

    #[test]
    fn test_message_keeps_inner_colons() {
        let (kind, msg) = split_terminal_line("ValueError: External ID not found in the system: base.foo");
        assert_eq!(kind, "ValueError");
        assert_eq!(msg, "External ID not found in the system: base.foo");
    }

    #[test]
    fn test_free_text_falls_back_to_unknown() {
        let (kind, msg) = split_terminal_line("   something went badly wrong   ");
        assert_eq!(kind, UNKNOWN_EXCEPTION);
        assert_eq!(msg, "something went badly wrong");
    }

    #[test]
    fn test_leading_digit_is_not_a_kind() {
        let (kind, msg) = split_terminal_line("404: not found");
        assert_eq!(kind, UNKNOWN_EXCEPTION);
        assert_eq!(msg, "404: not found");
    }

    #[test]
    fn test_classify_uses_last_non_blank_line() {
        let record = classify_block(&block(&[
            "Traceback (most recent call last):",
            "  File \"x.py\", line 3, in <module>",
            "KeyError: 'partner_id'",
            "   ",
        ]));
        assert_eq!(record.exception_kind, "KeyError");
        assert_eq!(record.message, "'partner_id'");
    }

    #[test]
    fn test_snippet_keeps_last_twenty_lines() {
        let mut lines = vec!["Traceback (most recent call last):".to_string()];
        for i in 0..30 {
            lines.push(format!("  frame {}", i));
        }
        lines.push("RuntimeError: deep".to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

        let record = classify_block(&block(&refs));
        let snippet_lines: Vec<&str> = record.snippet.lines().collect();
        assert_eq!(snippet_lines.len(), SNIPPET_LINES);
        assert_eq!(snippet_lines.last(), Some(&"RuntimeError: deep"));
        assert_eq!(snippet_lines[0], "  frame 11");
    }

    #[test]
    fn test_short_block_snippet_is_whole_block() {
        let record = classify_block(&block(&["Traceback (most recent call last):", "OSError: disk"]));
        assert_eq!(record.snippet, "Traceback (most recent call last):\nOSError: disk");
    }

    #[test]
    fn test_marker_only_block() {
        let record = classify_block(&block(&["Traceback (most recent call last):"]));
        assert_eq!(record.exception_kind, UNKNOWN_EXCEPTION);
        assert_eq!(record.message, "Traceback (most recent call last):");
    }
}
