//! Relevance filtering and exact duplicate removal.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use scrub_model::{CellValue, DedupeConfig, Record, RelevancePredicate, Table};

use crate::error::{Result, require_columns};
use crate::report::StageReport;
use crate::{Stage, TableStage};

/// Drops irrelevant rows, then every row equal to an earlier one on the key.
///
/// Keeps the first occurrence and the original order of the survivors.
pub struct Deduplicator {
    key_columns: Option<Vec<String>>,
    relevance: Option<Box<dyn RelevancePredicate>>,
}

impl fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deduplicator")
            .field("key_columns", &self.key_columns)
            .field("relevance", &self.relevance.is_some())
            .finish()
    }
}

impl Deduplicator {
    pub fn new(config: &DedupeConfig) -> Self {
        Self {
            key_columns: config.key_columns.clone(),
            relevance: config
                .relevance
                .clone()
                .map(|rule| Box::new(rule) as Box<dyn RelevancePredicate>),
        }
    }

    /// Replaces the configured relevance rule with any predicate.
    pub fn with_relevance(mut self, predicate: impl RelevancePredicate + 'static) -> Self {
        self.relevance = Some(Box::new(predicate));
        self
    }

    fn key(&self, columns: &[String], row: &Record) -> Vec<CellValue> {
        let names = self.key_columns.as_deref().unwrap_or(columns);
        names.iter().map(|name| row.get(name).clone()).collect()
    }
}

impl TableStage for Deduplicator {
    fn stage(&self) -> Stage {
        Stage::Dedupe
    }

    fn apply(&self, table: Table, report: &mut StageReport) -> Result<Table> {
        if let Some(keys) = &self.key_columns {
            require_columns(Stage::Dedupe, table.columns(), keys.iter().map(String::as_str))?;
        }
        if let Some(predicate) = &self.relevance {
            require_columns(Stage::Dedupe, table.columns(), predicate.columns())?;
        }

        let (columns, rows) = table.into_parts();
        let mut kept = Vec::with_capacity(rows.len());
        let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(rows.len());
        for row in rows {
            if let Some(predicate) = &self.relevance
                && !predicate.is_relevant(&row)
            {
                report.irrelevant_rows += 1;
                debug!(row = %row.id, "dropped irrelevant row");
                continue;
            }
            let key = self.key(&columns, &row);
            if seen.contains(&key) {
                report.duplicate_rows += 1;
                debug!(row = %row.id, "dropped duplicate row");
                continue;
            }
            seen.insert(key);
            kept.push(row);
        }
        Ok(Table::from_rows(columns, kept)?)
    }
}

/// Runs deduplication on its own with the configured rule, discarding the report.
///
/// # Errors
///
/// [`crate::TransformError::UnknownColumn`] when a key or rule column is absent.
pub fn dedupe(table: Table, config: &DedupeConfig) -> Result<Table> {
    let mut report = StageReport::new(Stage::Dedupe, table.len());
    Deduplicator::new(config).apply(table, &mut report)
}
