#![deny(unsafe_code)]

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use crate::numeric::{format_numeric, parse_f64};
use crate::{ModelError, RowId, column_name};

/// A single cell: text, number, or the explicit missing marker.
///
/// Equality is exact. Numbers compare by value with `-0.0 == 0.0`, and a NaN
/// equals itself so the type can serve as a hash key. Variants never compare
/// equal to each other: `Text("1") != Number(1.0)`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric reading of the cell: numbers, and text that parses as a finite number.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => parse_f64(value),
            Self::Missing => None,
        }
    }

    /// Text rendering used by the CSV sink; missing renders as an empty field.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value),
            Self::Number(value) => Cow::Owned(format_numeric(*value)),
            Self::Missing => Cow::Borrowed(""),
        }
    }

    fn number_bits(value: f64) -> u64 {
        if value == 0.0 {
            0.0f64.to_bits()
        } else if value.is_nan() {
            f64::NAN.to_bits()
        } else {
            value.to_bits()
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            (Self::Missing, Self::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Text(value) => value.hash(state),
            Self::Number(value) => Self::number_bits(*value).hash(state),
            Self::Missing => {}
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One row: column name to cell, tagged with its source position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub id: RowId,
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Cell for `column`; absent columns read as missing.
    pub fn get(&self, column: &str) -> &CellValue {
        const MISSING: &CellValue = &CellValue::Missing;
        self.cells.get(column).unwrap_or(MISSING)
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.cells.remove(column)
    }
}

/// Ordered rows sharing one ordered column list.
///
/// Column names are unique and every row holds exactly the table's columns.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut seen = BTreeSet::new();
        for column in columns {
            let name = column_name(column)?;
            if !seen.insert(name.clone()) {
                return Err(ModelError::DuplicateColumn(name));
            }
            names.push(name);
        }
        Ok(Self {
            columns: names,
            rows: Vec::new(),
        })
    }

    pub fn from_rows<I, S>(columns: I, rows: Vec<Record>) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row after checking it holds exactly the table's columns.
    pub fn push_row(&mut self, row: Record) -> Result<(), ModelError> {
        if row.cells.len() != self.columns.len() {
            return Err(ModelError::RowShape {
                row: row.id,
                detail: format!(
                    "expected {} cells, found {}",
                    self.columns.len(),
                    row.cells.len()
                ),
            });
        }
        if let Some(column) = self.columns.iter().find(|c| !row.cells.contains_key(*c)) {
            return Err(ModelError::RowShape {
                row: row.id,
                detail: format!("missing column {column}"),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column in row order.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.columns, self.rows)
    }
}
