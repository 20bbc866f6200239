//! CSV output format for analysis results
//!
//! One row per result, examples omitted. Hints are joined with ` | `.

use crate::grouping::GroupedResult;

/// Separator between hints inside the `hints` column
pub const HINT_SEPARATOR: &str = " | ";

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<GroupedResult>,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result row
    pub fn add_result(&mut self, result: GroupedResult) {
        self.rows.push(result);
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(result: &GroupedResult) -> String {
        let first_timestamp = result
            .first_timestamp
            .map(|ts| ts.to_string())
            .unwrap_or_default();

        [
            Self::escape_field(&result.exception_kind),
            Self::escape_field(&result.message),
            result.count.to_string(),
            first_timestamp,
            Self::escape_field(&result.hints.join(HINT_SEPARATOR)),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::from("exception_kind,message,count,first_timestamp,hints\n");

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn result(kind: &str, message: &str, hints: &[&str]) -> GroupedResult {
        GroupedResult {
            exception_kind: kind.to_string(),
            message: message.to_string(),
            count: 4,
            first_timestamp: None,
            examples: vec!["snippet".to_string()],
            hints: hints.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            CsvOutput::new().to_csv(),
            "exception_kind,message,count,first_timestamp,hints\n"
        );
    }

    #[test]
    fn test_plain_row() {
        let mut csv = CsvOutput::new();
        csv.add_result(result("KeyError", "'x'", &[]));
        let out = csv.to_csv();
        assert_eq!(out.lines().nth(1), Some("KeyError,'x',4,,"));
    }

    #[test]
    fn test_quotes_and_commas_escaped() {
        let mut csv = CsvOutput::new();
        csv.add_result(result(
            "IntegrityError",
            "duplicate key value violates unique constraint \"x\", again",
            &["first", "second"],
        ));
        let out = csv.to_csv();
        assert!(out.contains(
            "\"duplicate key value violates unique constraint \"\"x\"\", again\""
        ));
        assert!(out.contains("first | second"));
    }

    #[test]
    fn test_timestamp_column() {
        let mut r = result("KeyError", "'x'", &[]);
        r.first_timestamp =
            NaiveDateTime::parse_from_str("2025-01-15 10:00:00", "%Y-%m-%d %H:%M:%S").ok();
        let mut csv = CsvOutput::new();
        csv.add_result(r);
        assert!(csv.to_csv().contains(",4,2025-01-15 10:00:00,"));
    }
}
