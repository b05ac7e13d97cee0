//! Row relevance predicates.
//!
//! The deduplication stage drops rows that fail a relevance predicate before
//! looking for duplicates. Any `Fn(&Record) -> bool` closure is a predicate;
//! [`RelevanceRule`] is the declarative form loaded from configuration.

use serde::{Deserialize, Serialize};

use crate::{CellValue, Record};

/// Decides whether a row is worth keeping.
pub trait RelevancePredicate {
    fn is_relevant(&self, record: &Record) -> bool;

    /// Columns the predicate reads, checked against the table before the stage runs.
    fn columns(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl<F> RelevancePredicate for F
where
    F: Fn(&Record) -> bool,
{
    fn is_relevant(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Declarative relevance rule.
///
/// Text comparisons trim the cell and ignore ASCII case; numbers compare by
/// their rendered text. A missing cell never equals anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum RelevanceRule {
    NotMissing { column: String },
    Equals { column: String, value: String },
    NotEquals { column: String, value: String },
    OneOf { column: String, values: Vec<String> },
    NoneOf { column: String, values: Vec<String> },
    All { rules: Vec<RelevanceRule> },
    Any { rules: Vec<RelevanceRule> },
    Not { of: Box<RelevanceRule> },
}

fn cell_equals(cell: &CellValue, expected: &str) -> bool {
    match cell {
        CellValue::Missing => false,
        CellValue::Text(_) | CellValue::Number(_) => {
            cell.render().trim().eq_ignore_ascii_case(expected.trim())
        }
    }
}

impl RelevanceRule {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::NotMissing { column } => !record.get(column).is_missing(),
            Self::Equals { column, value } => cell_equals(record.get(column), value),
            Self::NotEquals { column, value } => !cell_equals(record.get(column), value),
            Self::OneOf { column, values } => {
                let cell = record.get(column);
                values.iter().any(|value| cell_equals(cell, value))
            }
            Self::NoneOf { column, values } => {
                let cell = record.get(column);
                !values.iter().any(|value| cell_equals(cell, value))
            }
            Self::All { rules } => rules.iter().all(|rule| rule.matches(record)),
            Self::Any { rules } => rules.iter().any(|rule| rule.matches(record)),
            Self::Not { of } => !of.matches(record),
        }
    }

    /// Every column named anywhere in the rule tree.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::NotMissing { column }
            | Self::Equals { column, .. }
            | Self::NotEquals { column, .. }
            | Self::OneOf { column, .. }
            | Self::NoneOf { column, .. } => out.push(column),
            Self::All { rules } | Self::Any { rules } => {
                for rule in rules {
                    rule.collect_columns(out);
                }
            }
            Self::Not { of } => of.collect_columns(out),
        }
    }
}

impl RelevancePredicate for RelevanceRule {
    fn is_relevant(&self, record: &Record) -> bool {
        self.matches(record)
    }

    fn columns(&self) -> Vec<&str> {
        self.referenced_columns()
    }
}
