//! CLI argument parsing for tbscan

use crate::analyze::AnalyzeConfig;
use crate::error::Result;
use crate::extract::{DEFAULT_LOOKBACK, TRACEBACK_MARKER};
use crate::filter::TimeRange;
use crate::grouping::MAX_EXAMPLES;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table sorted by count (default)
    Table,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "tbscan")]
#[command(version)]
#[command(about = "Find, group and explain tracebacks in application server logs", long_about = None)]
pub struct Cli {
    /// Log file to analyze (e.g. odoo.log)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only keep tracebacks at or after this time ('YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD')
    #[arg(long, value_name = "WHEN")]
    pub since: Option<String>,

    /// Only keep tracebacks at or before this time ('YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD')
    #[arg(long, value_name = "WHEN")]
    pub until: Option<String>,

    /// List every traceback instead of grouping repeats
    #[arg(long = "no-group", action = ArgAction::SetFalse)]
    pub group: bool,

    /// Do not attach diagnostic hints
    #[arg(long = "no-suggest", action = ArgAction::SetFalse)]
    pub suggest: bool,

    /// Output format
    #[arg(long = "format", visible_alias = "output", value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// TOML file with extra hint rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Text that starts a failure block
    #[arg(long, value_name = "TEXT", default_value = TRACEBACK_MARKER)]
    pub marker: String,

    /// Lines searched above a traceback for its timestamp
    #[arg(long, value_name = "LINES", default_value_t = DEFAULT_LOOKBACK)]
    pub lookback: usize,

    /// Example snippets kept per group
    #[arg(long = "max-examples", value_name = "N", default_value_t = MAX_EXAMPLES)]
    pub max_examples: usize,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Build the analysis configuration, validating time boundaries
    pub fn analyze_config(&self) -> Result<AnalyzeConfig> {
        let time_range = TimeRange::from_bounds(self.since.as_deref(), self.until.as_deref())?;

        Ok(AnalyzeConfig {
            time_range,
            group: self.group,
            suggest: self.suggest,
            marker: self.marker.clone(),
            lookback: self.lookback,
            max_examples: self.max_examples,
        })
    }
}
