//! Error types for traceback analysis
//!
//! Only conditions that abort a run live here. A missing timestamp, an
//! unrecognised terminal line or an empty result set are normal outcomes
//! and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised before or during a run
#[derive(Error, Debug)]
pub enum TbscanError {
    #[error("Failed to read log {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for --{flag}: '{value}' (expected 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD')")]
    InvalidBoundary { flag: &'static str, value: String },

    #[error("Failed to read hint rules {}: {source}", path.display())]
    RuleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse hint rules: {0}")]
    RuleParse(#[from] toml::de::Error),

    #[error("Invalid hint pattern '{pattern}': {source}")]
    InvalidRulePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl TbscanError {
    /// True for errors caused by malformed command-line input
    pub fn is_usage_error(&self) -> bool {
        matches!(self, TbscanError::InvalidBoundary { .. })
    }
}

pub type Result<T> = std::result::Result<T, TbscanError>;
