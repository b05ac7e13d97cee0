//! Column projection: split one combined column, then keep or drop columns.

use std::collections::BTreeSet;

use tracing::debug;

use scrub_model::{CellValue, ProjectConfig, Record, SplitSpec, Table, column_name};

use crate::error::{Result, TransformError, require_columns};
use crate::report::{IssueKind, StageReport};
use crate::{Stage, TableStage};

/// Splits `value` on `separator` into exactly `parts` cells.
///
/// The last part keeps the unsplit remainder. When the value yields fewer
/// parts, the trailing cells are missing and the second item is `true`.
/// Empty parts are missing. A missing value gives all-missing cells and is not
/// counted as malformed.
pub fn split_value(value: &CellValue, separator: &str, parts: usize) -> (Vec<CellValue>, bool) {
    if value.is_missing() || parts == 0 {
        return (vec![CellValue::Missing; parts], false);
    }
    let text = value.render();
    let mut cells: Vec<CellValue> = text
        .splitn(parts, separator)
        .map(|part| {
            if part.is_empty() {
                CellValue::Missing
            } else {
                CellValue::text(part)
            }
        })
        .collect();
    let malformed = cells.len() < parts;
    cells.resize(parts, CellValue::Missing);
    (cells, malformed)
}

#[derive(Debug, Clone)]
pub struct ColumnProjector {
    keep: Option<Vec<String>>,
    drop: Vec<String>,
    split: Option<SplitSpec>,
}

impl ColumnProjector {
    /// Checks the parts of the configuration that do not depend on the table.
    ///
    /// # Errors
    ///
    /// [`TransformError::InvalidConfig`] when both a keep-list and a drop-list
    /// are given, or when the split has an empty separator, no result columns,
    /// result names that are blank or padded, or repeated result columns.
    pub fn new(config: &ProjectConfig) -> Result<Self> {
        if config.keep.is_some() && !config.drop.is_empty() {
            return Err(invalid("use either a keep list or a drop list, not both"));
        }
        if let Some(split) = &config.split {
            if split.separator.is_empty() {
                return Err(invalid(format!(
                    "split of {:?} has an empty separator",
                    split.source
                )));
            }
            if split.into.is_empty() {
                return Err(invalid(format!(
                    "split of {:?} names no result columns",
                    split.source
                )));
            }
            if let Some(bad) = split
                .into
                .iter()
                .find(|name| column_name(name.as_str()).ok().as_deref() != Some(name.as_str()))
            {
                return Err(invalid(format!(
                    "split result column {bad:?} is blank or has surrounding whitespace"
                )));
            }
            let mut seen = BTreeSet::new();
            if let Some(dup) = split.into.iter().find(|name| !seen.insert(name.as_str())) {
                return Err(invalid(format!("split result column {dup:?} is repeated")));
            }
        }
        Ok(Self {
            keep: config.keep.clone(),
            drop: config.drop.clone(),
            split: config.split.clone(),
        })
    }

    fn split_columns(&self, table: Table, report: &mut StageReport) -> Result<Table> {
        let Some(spec) = &self.split else {
            return Ok(table);
        };
        require_columns(Stage::Project, table.columns(), [spec.source.as_str()])?;
        for name in &spec.into {
            let replaces_source = *name == spec.source && !spec.keep_source;
            if table.has_column(name) && !replaces_source {
                return Err(TransformError::ColumnConflict {
                    stage: Stage::Project,
                    column: name.clone(),
                });
            }
        }

        let (columns, rows) = table.into_parts();
        let mut new_columns = Vec::with_capacity(columns.len() + spec.into.len());
        for column in columns {
            if column == spec.source {
                if spec.keep_source {
                    new_columns.push(column);
                }
                new_columns.extend(spec.into.iter().cloned());
            } else {
                new_columns.push(column);
            }
        }

        let mut new_rows = Vec::with_capacity(rows.len());
        for mut row in rows {
            let source = if spec.keep_source {
                row.get(&spec.source).clone()
            } else {
                row.remove(&spec.source).unwrap_or(CellValue::Missing)
            };
            let (parts, malformed) = split_value(&source, &spec.separator, spec.into.len());
            if malformed {
                debug!(row = %row.id, column = %spec.source, "combined value has too few parts");
                report.record_issue(
                    IssueKind::MalformedSplit,
                    row.id,
                    &spec.source,
                    source.render(),
                );
            }
            for (name, cell) in spec.into.iter().zip(parts) {
                row.set(name.clone(), cell);
            }
            new_rows.push(row);
        }
        Ok(Table::from_rows(new_columns, new_rows)?)
    }

    /// The split source when the split already removed it from the table.
    fn consumed_source(&self) -> Option<&str> {
        self.split
            .as_ref()
            .filter(|spec| !spec.keep_source && !spec.into.contains(&spec.source))
            .map(|spec| spec.source.as_str())
    }

    fn select_columns(&self, table: Table) -> Result<Table> {
        let removed: BTreeSet<String> = match &self.keep {
            Some(keep) => {
                require_columns(Stage::Project, table.columns(), keep.iter().map(String::as_str))?;
                table
                    .columns()
                    .iter()
                    .filter(|c| !keep.contains(*c))
                    .cloned()
                    .collect()
            }
            None => {
                let consumed = self.consumed_source();
                let drop: Vec<&str> = self
                    .drop
                    .iter()
                    .map(String::as_str)
                    .filter(|name| Some(*name) != consumed)
                    .collect();
                require_columns(Stage::Project, table.columns(), drop.iter().copied())?;
                drop.into_iter().map(str::to_string).collect()
            }
        };
        if removed.is_empty() {
            return Ok(table);
        }

        let (columns, rows) = table.into_parts();
        let columns: Vec<String> = columns
            .into_iter()
            .filter(|c| !removed.contains(c))
            .collect();
        let rows: Vec<Record> = rows
            .into_iter()
            .map(|mut row| {
                row.cells.retain(|name, _| !removed.contains(name));
                row
            })
            .collect();
        Ok(Table::from_rows(columns, rows)?)
    }
}

impl TableStage for ColumnProjector {
    fn stage(&self) -> Stage {
        Stage::Project
    }

    fn apply(&self, table: Table, report: &mut StageReport) -> Result<Table> {
        let table = self.split_columns(table, report)?;
        self.select_columns(table)
    }
}

fn invalid(message: impl Into<String>) -> TransformError {
    TransformError::InvalidConfig {
        stage: Stage::Project,
        message: message.into(),
    }
}

/// Runs the projection on its own, discarding the report.
///
/// # Errors
///
/// See [`ColumnProjector::new`]; also fails when a named column is absent or
/// a split result column collides with an existing one.
pub fn project(table: Table, config: &ProjectConfig) -> Result<Table> {
    let mut report = StageReport::new(Stage::Project, table.len());
    ColumnProjector::new(config)?.apply(table, &mut report)
}
