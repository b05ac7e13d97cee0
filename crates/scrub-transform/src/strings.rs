//! Whitespace trimming and value canonicalization for text columns.

use std::collections::BTreeMap;

use tracing::debug;

use scrub_model::{CanonicalMap, CellValue, StringConfig, Table};

use crate::error::{Result, require_columns};
use crate::report::{IssueKind, StageReport};
use crate::{Stage, TableStage};

/// Outcome of normalizing one text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedText {
    Value(String),
    /// Blank after trimming, with blank-as-missing enabled.
    Missing,
    /// A map exists for the column but has no entry; the cleaned value is kept.
    Unmapped(String),
}

impl NormalizedText {
    pub fn into_cell(self) -> CellValue {
        match self {
            Self::Value(value) | Self::Unmapped(value) => CellValue::Text(value),
            Self::Missing => CellValue::Missing,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StringNormalizer {
    columns: Vec<String>,
    collapse_whitespace: bool,
    blank_as_missing: bool,
    strip_chars: BTreeMap<String, Vec<char>>,
    canonical: BTreeMap<String, CanonicalMap>,
}

impl StringNormalizer {
    pub fn new(config: &StringConfig) -> Self {
        let mut columns = config.columns.clone();
        for name in config.strip_chars.keys().chain(config.canonical.keys()) {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        Self {
            columns,
            collapse_whitespace: config.collapse_whitespace,
            blank_as_missing: config.blank_as_missing,
            strip_chars: config
                .strip_chars
                .iter()
                .map(|(column, chars)| (column.clone(), chars.chars().collect()))
                .collect(),
            canonical: config.canonical.clone(),
        }
    }

    /// Columns the stage touches: the listed ones plus any with a strip set or map.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Trims, optionally collapses and strips, then canonicalizes `value`.
    pub fn normalize_text(&self, column: &str, value: &str) -> NormalizedText {
        let collapsed;
        let base = if self.collapse_whitespace {
            collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            collapsed.as_str()
        } else {
            value
        };
        let cleaned = match self.strip_chars.get(column) {
            Some(strip) => base.trim_matches(|c: char| c.is_whitespace() || strip.contains(&c)),
            None => base.trim(),
        }
        .to_string();
        if cleaned.is_empty() && self.blank_as_missing {
            return NormalizedText::Missing;
        }
        match self.canonical.get(column) {
            Some(map) => match map.resolve(&cleaned) {
                Some(canonical) => NormalizedText::Value(canonical.to_string()),
                None if cleaned.is_empty() => NormalizedText::Value(cleaned),
                None => NormalizedText::Unmapped(cleaned),
            },
            None => NormalizedText::Value(cleaned),
        }
    }
}

impl TableStage for StringNormalizer {
    fn stage(&self) -> Stage {
        Stage::Strings
    }

    fn apply(&self, table: Table, report: &mut StageReport) -> Result<Table> {
        require_columns(
            Stage::Strings,
            table.columns(),
            self.columns.iter().map(String::as_str),
        )?;

        let (columns, mut rows) = table.into_parts();
        for row in &mut rows {
            for column in &self.columns {
                let Some(CellValue::Text(value)) = row.cells.get(column) else {
                    continue;
                };
                let outcome = self.normalize_text(column, value);
                if let NormalizedText::Unmapped(cleaned) = &outcome {
                    debug!(row = %row.id, column = %column, "no canonical entry for value");
                    report.record_issue(IssueKind::UnmappedString, row.id, column, cleaned.clone());
                }
                let cell = outcome.into_cell();
                if row.get(column) != &cell {
                    report.cells_changed += 1;
                    row.set(column.clone(), cell);
                }
            }
        }
        Ok(Table::from_rows(columns, rows)?)
    }
}

/// Runs string normalization on its own, discarding the report.
///
/// # Errors
///
/// [`crate::TransformError::UnknownColumn`] when a targeted column is absent.
pub fn normalize_strings(table: Table, config: &StringConfig) -> Result<Table> {
    let mut report = StageReport::new(Stage::Strings, table.len());
    StringNormalizer::new(config).apply(table, &mut report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(config: StringConfig) -> StringNormalizer {
        StringNormalizer::new(&config)
    }

    #[test]
    fn trims_but_keeps_internal_spacing() {
        let n = normalizer(StringConfig::default());
        assert_eq!(
            n.normalize_text("name", "  Mary  Ann "),
            NormalizedText::Value("Mary  Ann".into())
        );
    }

    #[test]
    fn collapses_when_configured() {
        let n = normalizer(StringConfig {
            collapse_whitespace: true,
            ..StringConfig::default()
        });
        assert_eq!(
            n.normalize_text("name", " Mary \t Ann "),
            NormalizedText::Value("Mary Ann".into())
        );
    }

    #[test]
    fn blank_handling_follows_config() {
        let n = normalizer(StringConfig::default());
        assert_eq!(n.normalize_text("name", "   "), NormalizedText::Missing);

        let n = normalizer(StringConfig {
            blank_as_missing: false,
            ..StringConfig::default()
        });
        assert_eq!(n.normalize_text("name", "   "), NormalizedText::Value(String::new()));
    }

    #[test]
    fn strips_configured_characters_per_column() {
        let n = normalizer(StringConfig {
            strip_chars: BTreeMap::from([("Last_Name".to_string(), "._/".to_string())]),
            ..StringConfig::default()
        });
        assert_eq!(
            n.normalize_text("Last_Name", " ...Smith_/ "),
            NormalizedText::Value("Smith".into())
        );
        assert_eq!(
            n.normalize_text("Street", "12 Main St."),
            NormalizedText::Value("12 Main St.".into())
        );
        assert_eq!(n.columns(), ["Last_Name"]);
    }

    #[test]
    fn strip_set_and_whitespace_interleave() {
        let n = normalizer(StringConfig {
            strip_chars: BTreeMap::from([("Last_Name".to_string(), "._/".to_string())]),
            ..StringConfig::default()
        });
        assert_eq!(
            n.normalize_text("Last_Name", ". _Smith / ."),
            NormalizedText::Value("Smith".into())
        );
        assert_eq!(n.normalize_text("Last_Name", " . / "), NormalizedText::Missing);
    }

    #[test]
    fn unmapped_values_pass_through_trimmed() {
        let map = CanonicalMap::from_pairs([("Y", "Yes"), ("N", "No")]).expect("map");
        let n = normalizer(StringConfig {
            canonical: BTreeMap::from([("Paying Customer".to_string(), map)]),
            ..StringConfig::default()
        });
        assert_eq!(
            n.normalize_text("Paying Customer", " y "),
            NormalizedText::Value("Yes".into())
        );
        assert_eq!(
            n.normalize_text("Paying Customer", " N/a "),
            NormalizedText::Unmapped("N/a".into())
        );
    }
}
