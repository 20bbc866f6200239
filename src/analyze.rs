//! End-to-end traceback analysis
//!
//! lines → blocks → classified records → time filter → grouped or flat
//! results → hints. Everything runs in one pass over an in-memory copy of
//! the log, in original line order.

use crate::classify::{classify_block, ClassifiedRecord};
use crate::error::{Result, TbscanError};
use crate::extract::{read_lines, BlockExtractor, DEFAULT_LOOKBACK, TRACEBACK_MARKER};
use crate::filter::TimeRange;
use crate::grouping::{flat_results, group_records, GroupedResult, MAX_EXAMPLES};
use crate::hints::HintRuleSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis options
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub time_range: TimeRange,
    /// Fold repeated failures together
    pub group: bool,
    /// Attach diagnostic hints
    pub suggest: bool,
    pub marker: String,
    pub lookback: usize,
    pub max_examples: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            time_range: TimeRange::unbounded(),
            group: true,
            suggest: true,
            marker: TRACEBACK_MARKER.to_string(),
            lookback: DEFAULT_LOOKBACK,
            max_examples: MAX_EXAMPLES,
        }
    }
}

/// Stage counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub blocks_detected: usize,
    pub records_classified: usize,
    pub records_retained: usize,
    pub grouped: bool,
}

/// Results of one run, ready for a presenter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub summary: AnalysisSummary,
    pub results: Vec<GroupedResult>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs the pipeline with a fixed configuration and rule set
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzeConfig,
    extractor: BlockExtractor,
    rules: HintRuleSet,
}

impl Analyzer {
    pub fn new(config: AnalyzeConfig, rules: HintRuleSet) -> Self {
        let extractor = BlockExtractor::new(config.marker.clone(), config.lookback);
        Self {
            config,
            extractor,
            rules,
        }
    }

    pub fn config(&self) -> &AnalyzeConfig {
        &self.config
    }

    /// Read a log file and analyze it
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<Analysis> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TbscanError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let text = String::from_utf8_lossy(&bytes);
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read log");

        Ok(self.analyze_text(&text))
    }

    /// Analyze already-decoded log text
    pub fn analyze_text(&self, text: &str) -> Analysis {
        let lines = read_lines(text);
        let blocks = self.extractor.extract(&lines);
        let records: Vec<ClassifiedRecord> = blocks.iter().map(classify_block).collect();

        let blocks_detected = blocks.len();
        let records_classified = records.len();
        tracing::debug!(
            lines = lines.len(),
            blocks = blocks_detected,
            "extracted failure blocks"
        );

        let retained: Vec<ClassifiedRecord> = records
            .into_iter()
            .filter(|r| self.config.time_range.contains(r.timestamp))
            .collect();
        tracing::debug!(
            retained = retained.len(),
            dropped = records_classified - retained.len(),
            "applied time range"
        );

        let mut results = if self.config.group {
            group_records(&retained, self.config.max_examples)
        } else {
            flat_results(&retained, self.config.max_examples)
        };

        if self.config.suggest {
            self.rules.attach(&mut results);
        }

        Analysis {
            summary: AnalysisSummary {
                blocks_detected,
                records_classified,
                records_retained: retained.len(),
                grouped: self.config.group,
            },
            results,
        }
    }
}
