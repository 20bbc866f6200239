//! Tabular summary for terminal output

use crate::analyze::Analysis;
use crate::grouping::sort_by_count;
use std::fmt::Write;

/// Message characters shown per row before eliding
const MESSAGE_WIDTH: usize = 80;

const RULE: &str = "------- ------------------- ------------------------------ ----------------";

fn elide(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render results as a table sorted by descending count
pub fn render_table(analysis: &Analysis) -> String {
    if analysis.results.is_empty() {
        return "No tracebacks found.\n".to_string();
    }

    let mut rows = analysis.results.clone();
    sort_by_count(&mut rows);

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "  count first seen          exception                      message");
    let _ = writeln!(out, "{}", RULE);

    for row in &rows {
        let first_seen = row
            .first_timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        let _ = writeln!(
            out,
            "{:>7} {:<19} {:<30} {}",
            row.count,
            first_seen,
            row.exception_kind,
            elide(&row.message, MESSAGE_WIDTH)
        );
        for hint in &row.hints {
            let _ = writeln!(out, "        hint: {}", hint);
        }
    }

    let total: usize = rows.iter().map(|r| r.count).sum();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "{:>7} total ({} rows, {} tracebacks detected)",
        total,
        rows.len(),
        analysis.summary.blocks_detected
    );

    out
}
