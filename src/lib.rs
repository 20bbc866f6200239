//! tbscan - Traceback extraction and grouping for application server logs
//!
//! This library finds Python tracebacks in a log file, stamps each with the
//! nearest preceding timestamp, classifies it by exception kind and message,
//! optionally restricts it to a time window, groups recurring failures and
//! attaches rule-based diagnostic hints.
//!
//! ```
//! use tbscan::analyze::{AnalyzeConfig, Analyzer};
//! use tbscan::hints::HintRuleSet;
//!
//! let log = "2025-01-15 10:00:00,000 1 ERROR db odoo.http: oops\n\
//!            Traceback (most recent call last):\n\
//!            KeyError: 'partner_id'\n";
//!
//! let analyzer = Analyzer::new(AnalyzeConfig::default(), HintRuleSet::builtin());
//! let analysis = analyzer.analyze_text(log);
//! assert_eq!(analysis.results[0].exception_kind, "KeyError");
//! ```

pub mod analyze;
pub mod classify;
pub mod cli;
pub mod csv_output;
pub mod error;
pub mod extract;
pub mod filter;
pub mod grouping;
pub mod hints;
pub mod json_output;
pub mod table_output;
pub mod timestamp;

pub use error::{Result, TbscanError};
