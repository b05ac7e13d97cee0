//! Missing value filling with constant or computed per-column defaults.
//!
//! Statistics are taken from the table as it enters the stage, before any
//! column is filled.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use scrub_model::{CellValue, ColumnDefault, Table};

use crate::error::{Result, TransformError, require_columns};
use crate::report::StageReport;
use crate::{Stage, TableStage};

/// Median of `values`; the mean of the two middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean, accumulated incrementally.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut mean = 0.0;
    for (count, value) in (1u32..).zip(values) {
        mean += (value - mean) / f64::from(count);
    }
    Some(mean)
}

/// Most frequent non-missing cell; ties go to the value seen first.
pub fn mode<'a, I>(cells: I) -> Option<CellValue>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut counts: Vec<(&CellValue, usize)> = Vec::new();
    let mut index: HashMap<&CellValue, usize> = HashMap::new();
    for cell in cells.into_iter().filter(|c| !c.is_missing()) {
        match index.get(cell) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(cell, counts.len());
                counts.push((cell, 1));
            }
        }
    }
    let mut best: Option<(&CellValue, usize)> = None;
    for (cell, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((cell, count));
        }
    }
    best.map(|(cell, _)| cell.clone())
}

fn numeric_values(table: &Table, column: &str) -> Vec<f64> {
    table
        .column_values(column)
        .filter_map(CellValue::numeric_value)
        .collect()
}

/// Resolves a default to the cell written into missing slots of `column`.
fn resolve_default(table: &Table, column: &str, default: &ColumnDefault) -> Result<CellValue> {
    let computed = match default {
        ColumnDefault::Text { value } => return Ok(CellValue::text(value.clone())),
        ColumnDefault::Number { value } => return Ok(CellValue::Number(*value)),
        ColumnDefault::Median => median(&numeric_values(table, column)).map(CellValue::Number),
        ColumnDefault::Mean => mean(&numeric_values(table, column)).map(CellValue::Number),
        ColumnDefault::Mode => mode(table.column_values(column)),
    };
    computed.ok_or_else(|| TransformError::NoStatisticData {
        column: column.to_string(),
        statistic: default.name(),
    })
}

#[derive(Debug, Clone)]
pub struct MissingValueFiller {
    defaults: BTreeMap<String, ColumnDefault>,
}

impl MissingValueFiller {
    pub fn new(defaults: &BTreeMap<String, ColumnDefault>) -> Self {
        Self {
            defaults: defaults.clone(),
        }
    }
}

impl TableStage for MissingValueFiller {
    fn stage(&self) -> Stage {
        Stage::Fill
    }

    fn apply(&self, table: Table, report: &mut StageReport) -> Result<Table> {
        require_columns(
            Stage::Fill,
            table.columns(),
            self.defaults.keys().map(String::as_str),
        )?;

        let mut values = BTreeMap::new();
        for (column, default) in &self.defaults {
            let value = resolve_default(&table, column, default)?;
            if default.is_statistic() {
                debug!(column = %column, statistic = default.name(), "computed fill value");
            }
            values.insert(column.as_str(), value);
        }

        let (columns, mut rows) = table.into_parts();
        for row in &mut rows {
            for (column, value) in &values {
                if row.get(column).is_missing() {
                    row.set(*column, value.clone());
                    *report.filled.entry((*column).to_string()).or_default() += 1;
                    report.cells_changed += 1;
                }
            }
        }
        Ok(Table::from_rows(columns, rows)?)
    }
}

/// Runs missing value filling on its own, discarding the report.
///
/// # Errors
///
/// [`TransformError::UnknownColumn`] for an absent column and
/// [`TransformError::NoStatisticData`] when a statistic has nothing to work on.
pub fn fill_missing(table: Table, defaults: &BTreeMap<String, ColumnDefault>) -> Result<Table> {
    let mut report = StageReport::new(Stage::Fill, table.len());
    MissingValueFiller::new(defaults).apply(table, &mut report)
}
