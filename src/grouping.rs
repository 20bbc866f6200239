//! Grouping of recurring failures
//!
//! Records sharing an exception kind and the first 120 characters of their
//! message fold into one result. Buckets are created in order of first
//! appearance and then stably sorted by descending count, so equal counts
//! keep file order.

use crate::classify::ClassifiedRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Message characters that take part in the grouping key
pub const MESSAGE_KEY_CHARS: usize = 120;

/// Default cap on retained example snippets per result
pub const MAX_EXAMPLES: usize = 3;

/// Grouping key: exception kind plus truncated message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub exception_kind: String,
    pub message_prefix: String,
}

impl GroupKey {
    pub fn for_record(record: &ClassifiedRecord) -> Self {
        Self {
            exception_kind: record.exception_kind.clone(),
            message_prefix: record.message.chars().take(MESSAGE_KEY_CHARS).collect(),
        }
    }
}

/// One row of output: a group of records, or a single record in flat mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedResult {
    pub exception_kind: String,
    /// Full message of the first record folded in
    pub message: String,
    pub count: usize,
    /// Earliest non-null timestamp seen
    pub first_timestamp: Option<NaiveDateTime>,
    pub examples: Vec<String>,
    pub hints: Vec<String>,
}

impl GroupedResult {
    fn from_record(record: &ClassifiedRecord) -> Self {
        Self {
            exception_kind: record.exception_kind.clone(),
            message: record.message.clone(),
            count: 1,
            first_timestamp: record.timestamp,
            examples: vec![record.snippet.clone()],
            hints: Vec::new(),
        }
    }

    fn fold(&mut self, record: &ClassifiedRecord, max_examples: usize) {
        self.count += 1;
        self.first_timestamp = match (self.first_timestamp, record.timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if self.examples.len() < max_examples {
            self.examples.push(record.snippet.clone());
        }
    }

    /// Text the hint engine matches against
    pub fn hint_text(&self) -> String {
        let mut text = String::with_capacity(
            self.exception_kind.len()
                + self.message.len()
                + self.examples.iter().map(String::len).sum::<usize>()
                + 8,
        );
        text.push_str(&self.exception_kind);
        text.push('\n');
        text.push_str(&self.message);
        for example in &self.examples {
            text.push('\n');
            text.push_str(example);
        }
        text
    }
}

/// Fold records into grouped results ordered by descending count
pub fn group_records(records: &[ClassifiedRecord], max_examples: usize) -> Vec<GroupedResult> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut results: Vec<GroupedResult> = Vec::new();

    for record in records {
        let key = GroupKey::for_record(record);
        match index.get(&key) {
            Some(&slot) => results[slot].fold(record, max_examples),
            None => {
                index.insert(key, results.len());
                let mut result = GroupedResult::from_record(record);
                result.examples.truncate(max_examples);
                results.push(result);
            }
        }
    }

    sort_by_count(&mut results);
    results
}

/// One result per record, in input order
pub fn flat_results(records: &[ClassifiedRecord], max_examples: usize) -> Vec<GroupedResult> {
    records
        .iter()
        .map(|record| {
            let mut result = GroupedResult::from_record(record);
            result.examples.truncate(max_examples);
            result
        })
        .collect()
}

/// Stable sort by descending count
pub fn sort_by_count(results: &mut [GroupedResult]) {
    results.sort_by(|a, b| b.count.cmp(&a.count));
}
