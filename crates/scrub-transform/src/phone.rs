//! Phone number normalization.
//!
//! Every value is reduced to its ASCII digits. Eleven digits with a leading
//! `1` lose the country code; ten digits are laid out as `DDD-DDD-DDDD`.
//! Anything else is left exactly as it was and reported as unparsed.

use std::borrow::Cow;

use tracing::debug;

use scrub_model::{CellValue, PhoneConfig, Table, format_numeric};

use crate::error::{Result, require_columns};
use crate::report::{IssueKind, StageReport};
use crate::{Stage, TableStage};

const CANONICAL_DIGITS: usize = 10;
const COUNTRY_CODE: char = '1';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneNormalization<'a> {
    /// `DDD-DDD-DDDD`.
    Canonical(String),
    /// The input, untouched.
    Unparsed(&'a str),
}

impl PhoneNormalization<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(value) => value,
            Self::Unparsed(original) => original,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical(_))
    }
}

fn national_digits(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == CANONICAL_DIGITS + 1 && digits.starts_with(COUNTRY_CODE) {
        digits[1..].to_string()
    } else {
        digits
    }
}

pub fn normalize_phone(value: &str) -> PhoneNormalization<'_> {
    let digits = national_digits(value);
    if digits.len() != CANONICAL_DIGITS {
        return PhoneNormalization::Unparsed(value);
    }
    PhoneNormalization::Canonical(format!(
        "{}-{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..]
    ))
}

/// Cell-level form: `None` when the cell is left as it is (missing or unparsed).
///
/// Numbers are normalized from their shortest rendering.
pub fn normalize_phone_cell(cell: &CellValue) -> Option<CellValue> {
    let text: Cow<'_, str> = match cell {
        CellValue::Missing => return None,
        CellValue::Text(value) => Cow::Borrowed(value),
        CellValue::Number(value) => Cow::Owned(format_numeric(*value)),
    };
    match normalize_phone(&text) {
        PhoneNormalization::Canonical(value) => Some(CellValue::Text(value)),
        PhoneNormalization::Unparsed(_) => None,
    }
}

#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    columns: Vec<String>,
}

impl PhoneNormalizer {
    pub fn new(config: &PhoneConfig) -> Self {
        Self {
            columns: config.columns.clone(),
        }
    }
}

impl TableStage for PhoneNormalizer {
    fn stage(&self) -> Stage {
        Stage::Phones
    }

    fn apply(&self, table: Table, report: &mut StageReport) -> Result<Table> {
        require_columns(
            Stage::Phones,
            table.columns(),
            self.columns.iter().map(String::as_str),
        )?;

        let (columns, mut rows) = table.into_parts();
        for row in &mut rows {
            for column in &self.columns {
                let cell = row.get(column);
                if cell.is_missing() {
                    continue;
                }
                match normalize_phone_cell(cell) {
                    Some(normalized) => {
                        if &normalized != cell {
                            report.cells_changed += 1;
                            row.set(column.clone(), normalized);
                        }
                    }
                    None => {
                        debug!(row = %row.id, column = %column, "phone number left as is");
                        let original = cell.render().into_owned();
                        report.record_issue(IssueKind::UnparsedPhone, row.id, column, original);
                    }
                }
            }
        }
        Ok(Table::from_rows(columns, rows)?)
    }
}

/// Runs phone normalization on its own, discarding the report.
///
/// # Errors
///
/// [`crate::TransformError::UnknownColumn`] when a phone column is absent.
pub fn normalize_phones(table: Table, config: &PhoneConfig) -> Result<Table> {
    let mut report = StageReport::new(Stage::Phones, table.len());
    PhoneNormalizer::new(config).apply(table, &mut report)
}
