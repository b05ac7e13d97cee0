//! Per-stage counters returned alongside the cleaned table.

use std::collections::BTreeMap;

use serde::Serialize;

use scrub_model::RowId;

use crate::Stage;

/// Row issues kept per stage; the counters keep counting past this.
pub const MAX_ISSUE_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MalformedSplit,
    UnmappedString,
    UnparsedPhone,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::MalformedSplit => "malformed split",
            Self::UnmappedString => "unmapped value",
            Self::UnparsedPhone => "unparsed phone",
        }
    }
}

/// One recovered row-level problem. `value` holds raw customer data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    pub kind: IssueKind,
    pub row: RowId,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub rows_in: usize,
    pub rows_out: usize,
    pub cells_changed: usize,
    pub malformed_splits: usize,
    pub irrelevant_rows: usize,
    pub duplicate_rows: usize,
    pub unmapped_strings: usize,
    pub unparsed_phones: usize,
    /// Cells filled, keyed by column.
    pub filled: BTreeMap<String, usize>,
    pub issues: Vec<RowIssue>,
}

impl StageReport {
    pub fn new(stage: Stage, rows_in: usize) -> Self {
        Self {
            stage,
            rows_in,
            rows_out: rows_in,
            cells_changed: 0,
            malformed_splits: 0,
            irrelevant_rows: 0,
            duplicate_rows: 0,
            unmapped_strings: 0,
            unparsed_phones: 0,
            filled: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    /// Counts an issue and keeps a sample while under [`MAX_ISSUE_SAMPLES`].
    pub(crate) fn record_issue(
        &mut self,
        kind: IssueKind,
        row: RowId,
        column: &str,
        value: impl Into<String>,
    ) {
        match kind {
            IssueKind::MalformedSplit => self.malformed_splits += 1,
            IssueKind::UnmappedString => self.unmapped_strings += 1,
            IssueKind::UnparsedPhone => self.unparsed_phones += 1,
        }
        if self.issues.len() < MAX_ISSUE_SAMPLES {
            self.issues.push(RowIssue {
                kind,
                row,
                column: column.to_string(),
                value: value.into(),
            });
        }
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }

    /// Recovered row-level problems (sampled or not).
    pub fn issue_count(&self) -> usize {
        self.malformed_splits + self.unmapped_strings + self.unparsed_phones
    }

    pub fn cells_filled(&self) -> usize {
        self.filled.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    pub fn rows_in(&self) -> usize {
        self.stages.first().map_or(0, |report| report.rows_in)
    }

    pub fn rows_out(&self) -> usize {
        self.stages.last().map_or(0, |report| report.rows_out)
    }

    pub fn cells_changed(&self) -> usize {
        self.stages.iter().map(|report| report.cells_changed).sum()
    }

    pub fn issue_count(&self) -> usize {
        self.stages.iter().map(StageReport::issue_count).sum()
    }

    pub fn issues(&self) -> impl Iterator<Item = &RowIssue> {
        self.stages.iter().flat_map(|report| report.issues.iter())
    }
}
