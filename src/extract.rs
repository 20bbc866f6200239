//! Failure block extraction
//!
//! Segments an ordered sequence of log lines into failure blocks. A block
//! starts at any line containing the failure marker and runs forward until
//! one of two heuristic terminators fires:
//!
//! 1. **Next record header**: a later line begins with a timestamp. That line
//!    belongs to the next log record and is left for the scanner.
//! 2. **Blank line**: an empty (or whitespace-only) line after at least one
//!    appended line. The blank line is not part of the block.
//!
//! Otherwise the block runs to end of input. This is an approximation of
//! where a traceback ends, and grouping downstream depends on its exact
//! behaviour, so changes here are design changes.
//!
//! Each block is tagged with the nearest parseable timestamp found by
//! looking back from the marker line (the marker line itself first, then up
//! to `lookback` preceding lines).

use crate::timestamp::{has_timestamp_prefix, parse_line_timestamp};
use chrono::NaiveDateTime;

/// Python's traceback header
pub const TRACEBACK_MARKER: &str = "Traceback (most recent call last):";

/// Lines searched above a marker for its timestamp
pub const DEFAULT_LOOKBACK: usize = 5;

/// One input line and its 0-based position in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub index: usize,
    pub text: String,
}

/// Contiguous lines belonging to one detected failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureBlock {
    /// Lines in original order, starting with the marker line
    pub lines: Vec<LogLine>,
    /// Nearest timestamp within the look-back window
    pub timestamp: Option<NaiveDateTime>,
}

impl FailureBlock {
    /// Index of the marker line in the source
    pub fn start_index(&self) -> usize {
        self.lines.first().map(|l| l.index).unwrap_or(0)
    }

    /// Index of the last line included in the block
    pub fn end_index(&self) -> usize {
        self.lines.last().map(|l| l.index).unwrap_or(0)
    }
}

/// Split decoded text into indexed lines
pub fn read_lines(text: &str) -> Vec<LogLine> {
    text.lines()
        .enumerate()
        .map(|(index, line)| LogLine {
            index,
            text: line.to_string(),
        })
        .collect()
}

/// Single-pass, non-backtracking block segmenter
#[derive(Debug, Clone)]
pub struct BlockExtractor {
    marker: String,
    lookback: usize,
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new(TRACEBACK_MARKER, DEFAULT_LOOKBACK)
    }
}

impl BlockExtractor {
    /// Create an extractor for a custom marker and look-back window
    pub fn new(marker: impl Into<String>, lookback: usize) -> Self {
        Self {
            marker: marker.into(),
            lookback,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Scan all lines once and emit every failure block in order
    pub fn extract(&self, lines: &[LogLine]) -> Vec<FailureBlock> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if !lines[i].text.contains(self.marker.as_str()) {
                i += 1;
                continue;
            }

            let timestamp = self.lookback_timestamp(lines, i);
            let end = Self::block_end(lines, i);

            tracing::trace!(
                start = lines[i].index,
                end = lines[end - 1].index,
                has_timestamp = timestamp.is_some(),
                "failure block"
            );

            blocks.push(FailureBlock {
                lines: lines[i..end].to_vec(),
                timestamp,
            });

            // Resume at the first line not taken by this block
            i = end;
        }

        blocks
    }

    /// Nearest parseable timestamp at or above `start`, closest line first
    fn lookback_timestamp(&self, lines: &[LogLine], start: usize) -> Option<NaiveDateTime> {
        let floor = start.saturating_sub(self.lookback);
        (floor..=start)
            .rev()
            .find_map(|j| parse_line_timestamp(&lines[j].text))
    }

    /// Exclusive end index of the block that starts at `start`
    fn block_end(lines: &[LogLine], start: usize) -> usize {
        let mut j = start;

        while j < lines.len() {
            let text = &lines[j].text;
            let appended = j - start;

            if appended > 0 && has_timestamp_prefix(text) {
                break;
            }
            if appended > 0 && text.trim().is_empty() {
                break;
            }

            j += 1;
        }

        j
    }
}
