//! Time-range filtering for classified records
//!
//! Supports:
//! - No bounds: every record passes
//! - `--since` and/or `--until`: inclusive, open-ended on an unset side
//!
//! A record without a timestamp cannot be placed in the window, so it is
//! dropped as soon as either bound is set. A missing `--until` does not make
//! a timestamp-less record eligible for a `--since` window.

use crate::error::{Result, TbscanError};
use crate::timestamp::parse_boundary;
use chrono::NaiveDateTime;

/// Inclusive time window applied before grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    since: Option<NaiveDateTime>,
    until: Option<NaiveDateTime>,
}

impl TimeRange {
    /// A range that accepts every record
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a range from already-parsed bounds
    pub fn new(since: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        if let (Some(s), Some(u)) = (since, until) {
            if s > u {
                tracing::warn!(%s, %u, "--since is later than --until; no record can match");
            }
        }
        Self { since, until }
    }

    /// Parse `--since`/`--until` text
    ///
    /// A malformed value is an error rather than "no bound": silently
    /// widening the window would hide the mistake.
    pub fn from_bounds(since: Option<&str>, until: Option<&str>) -> Result<Self> {
        let since = parse_flag("since", since)?;
        let until = parse_flag("until", until)?;
        Ok(Self::new(since, until))
    }

    pub fn since(&self) -> Option<NaiveDateTime> {
        self.since
    }

    pub fn until(&self) -> Option<NaiveDateTime> {
        self.until
    }

    /// True when either side is set
    pub fn is_bounded(&self) -> bool {
        self.since.is_some() || self.until.is_some()
    }

    /// Check if a record with this timestamp should be kept
    pub fn contains(&self, timestamp: Option<NaiveDateTime>) -> bool {
        if !self.is_bounded() {
            return true;
        }

        let Some(ts) = timestamp else {
            return false;
        };

        self.since.map_or(true, |s| ts >= s) && self.until.map_or(true, |u| ts <= u)
    }
}

fn parse_flag(flag: &'static str, value: Option<&str>) -> Result<Option<NaiveDateTime>> {
    match value {
        None => Ok(None),
        Some(raw) => parse_boundary(raw)
            .map(Some)
            .ok_or_else(|| TbscanError::InvalidBoundary {
                flag,
                value: raw.to_string(),
            }),
    }
}
