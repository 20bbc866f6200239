//! Rule-based diagnostic hints
//!
//! A hint rule pairs a regex with advice. Every rule is evaluated against a
//! result's text in declaration order and every match contributes its hint,
//! so the output order always follows the rule list.
//!
//! # Example tbscan-rules.toml
//!
//! ```toml
//! # Append to the built-in rules (set to true to use only these)
//! replace_builtin = false
//!
//! [[rule]]
//! pattern = "(?i)stock\\.quant"
//! hint = "Reserved quantities are out of sync; run the stock quant fixer."
//! ```

use crate::error::{Result, TbscanError};
use crate::grouping::GroupedResult;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Hint attached to unique constraint violations
pub const UNIQUE_CONSTRAINT_HINT: &str = "A unique constraint was violated: look for duplicate records \
     (re-imported data, a create() without a prior search) and check the constraint named in the message.";

/// Built-in rules, in evaluation order
const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        r"(?i)UniqueViolation|violates unique constraint",
        UNIQUE_CONSTRAINT_HINT,
    ),
    (
        r"(?i)External ID not found",
        "An XML ID lookup failed: check the module's 'depends' in __manifest__.py, \
         data file load order, and the spelling of module.xml_id passed to env.ref().",
    ),
    (
        r"(?i)Invalid view|Error while validating view|cannot be located in parent view|Field .* does not exist",
        "A view architecture failed validation: check XPath targets against the inherited \
         view and that every referenced field exists on the model (upgrade the module after adding fields).",
    ),
    (
        r"(?i)AccessError|You are not allowed to",
        "Access rights denied the operation: review ir.model.access.csv entries, record \
         rules and the groups of the acting user; avoid sudo() unless intended.",
    ),
    (
        r"(?i)MissingError|Record does not exist or has been deleted",
        "A record referenced by id no longer exists: look for stale ids in context, \
         cron arguments or many2one values pointing at deleted rows.",
    ),
    (
        r"(?i)ForeignKeyViolation|violates foreign key constraint",
        "A foreign key constraint failed: the referenced row is missing or still in use; \
         check ondelete policies and the order in which records are created or unlinked.",
    ),
    (
        r"(?i)NotNullViolation|violates not-null constraint",
        "A required column was left empty: set the field in create()/write() or give it a default.",
    ),
    (
        r"(?i)could not serialize access|SerializationFailure|concurrent update",
        "Concurrent transactions touched the same rows: shorten long transactions, \
         avoid updating shared records from crons, and let the request retry.",
    ),
    (
        r"(?i)has no attribute|KeyError: '[a-z_]+_id'|Invalid field",
        "Code refers to a field or attribute the model does not have: the module may \
         need an upgrade (-u) or a dependency is missing.",
    ),
    (
        r"(?i)QWebException|Error while render|Error to render compiling AST",
        "A QWeb template failed to render: inspect the template expression in the \
         traceback and guard against empty or missing values.",
    ),
    (
        r"(?i)OperationalError|could not connect to server|Connection refused|too many clients",
        "The database connection failed: check PostgreSQL availability, db_host/db_port \
         in the server config and the connection pool size (db_maxconn).",
    ),
];

/// One pattern and the advice it triggers
#[derive(Debug, Clone)]
pub struct HintRule {
    pattern: Regex,
    hint: String,
}

impl HintRule {
    /// Compile a rule; an invalid pattern is a configuration error
    pub fn new(pattern: &str, hint: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| TbscanError::InvalidRulePattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            hint: hint.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Rule file layout
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct RuleFile {
    /// Use only the rules in the file
    #[serde(default)]
    replace_builtin: bool,
    #[serde(default)]
    rule: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct RuleEntry {
    pattern: String,
    hint: String,
}

/// Immutable, ordered list of hint rules
#[derive(Debug, Clone, Default)]
pub struct HintRuleSet {
    rules: Vec<HintRule>,
}

impl HintRuleSet {
    /// Build a set from rules in the given order
    pub fn new(rules: Vec<HintRule>) -> Self {
        Self { rules }
    }

    /// Rules for Odoo, PostgreSQL and Python failure signatures
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(pattern, hint)| HintRule {
                pattern: Regex::new(pattern).unwrap(),
                hint: (*hint).to_string(),
            })
            .collect();
        Self { rules }
    }

    /// Load a rule file, appended to or replacing the built-in rules
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TbscanError::RuleFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse rules from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content)?;

        let mut set = if file.replace_builtin {
            Self::default()
        } else {
            Self::builtin()
        };

        for entry in file.rule {
            set.rules.push(HintRule::new(&entry.pattern, entry.hint)?);
        }

        tracing::debug!(
            rules = set.rules.len(),
            replace_builtin = file.replace_builtin,
            "loaded hint rules"
        );

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[HintRule] {
        &self.rules
    }

    /// Hints of every matching rule, in rule order, duplicates kept
    pub fn hints_for(&self, text: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(text))
            .map(|rule| rule.hint.clone())
            .collect()
    }

    /// Fill the hint list of every result
    pub fn attach(&self, results: &mut [GroupedResult]) {
        for result in results.iter_mut() {
            result.hints = self.hints_for(&result.hint_text());
        }
    }
}
