//! JSON output format for analysis results
//!
//! `--format json` emits the engine's results unchanged, in engine order.

use crate::analyze::Analysis;
use crate::grouping::GroupedResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single result row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResult {
    /// Exception kind (e.g., "psycopg2.errors.UniqueViolation")
    pub exception_kind: String,
    pub message: String,
    /// Occurrences folded into this row (1 in flat mode)
    pub count: usize,
    /// Earliest timestamp seen, null when none could be found
    pub first_timestamp: Option<NaiveDateTime>,
    /// Up to the configured number of snippets
    pub examples: Vec<String>,
    /// Diagnostic hints in rule order
    pub hints: Vec<String>,
}

impl From<&GroupedResult> for JsonResult {
    fn from(result: &GroupedResult) -> Self {
        Self {
            exception_kind: result.exception_kind.clone(),
            message: result.message.clone(),
            count: result.count,
            first_timestamp: result.first_timestamp,
            examples: result.examples.clone(),
            hints: result.hints.clone(),
        }
    }
}

/// Summary statistics for the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub blocks_detected: usize,
    pub records_classified: usize,
    /// Records left after the time filter
    pub records_retained: usize,
    /// Number of result rows
    pub groups: usize,
    pub grouped: bool,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Analyzed log path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub summary: JsonSummary,
    pub results: Vec<JsonResult>,
}

impl JsonOutput {
    /// Create a new JSON output structure
    pub fn new(analysis: &Analysis, source: Option<String>) -> Self {
        let summary = &analysis.summary;
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "tbscan-json-v1".to_string(),
            source,
            summary: JsonSummary {
                blocks_detected: summary.blocks_detected,
                records_classified: summary.records_classified,
                records_retained: summary.records_retained,
                groups: analysis.results.len(),
                grouped: summary.grouped,
            },
            results: analysis.results.iter().map(JsonResult::from).collect(),
        }
    }

    /// Serialize to pretty JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
