//! Fixed-order composition of the cleaning stages.
//!
//! ```ignore
//! let pipeline = Pipeline::from_config(&PipelineConfig::customer_call_list())?;
//! let PipelineOutput { table, report } = pipeline.execute(raw)?;
//! ```

use std::time::Instant;

use tracing::{info, info_span};

use scrub_model::{PipelineConfig, RelevancePredicate, Table};

use crate::dedupe::Deduplicator;
use crate::error::Result;
use crate::fill::MissingValueFiller;
use crate::phone::PhoneNormalizer;
use crate::project::ColumnProjector;
use crate::report::{PipelineReport, StageReport};
use crate::strings::StringNormalizer;
use crate::Stage;

/// One table-to-table step of the pipeline.
pub trait TableStage {
    fn stage(&self) -> Stage;

    /// Consumes `table` and returns the transformed one, counting into `report`.
    ///
    /// # Errors
    ///
    /// Only configuration problems; row-level issues are recovered and counted.
    fn apply(&self, table: Table, report: &mut StageReport) -> Result<Table>;
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub table: Table,
    pub report: PipelineReport,
}

/// Project, dedupe, strings, phones, fill.
#[derive(Debug)]
pub struct Pipeline {
    projector: ColumnProjector,
    deduplicator: Deduplicator,
    strings: StringNormalizer,
    phones: PhoneNormalizer,
    filler: MissingValueFiller,
}

impl Pipeline {
    /// Builds every stage from its configuration section.
    ///
    /// # Errors
    ///
    /// Fails on configuration that is invalid regardless of the table, such as
    /// a split without separator. Column checks happen in [`Pipeline::execute`].
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            projector: ColumnProjector::new(&config.project)?,
            deduplicator: Deduplicator::new(&config.dedupe),
            strings: StringNormalizer::new(&config.strings),
            phones: PhoneNormalizer::new(&config.phones),
            filler: MissingValueFiller::new(&config.fill),
        })
    }

    /// Uses `predicate` instead of the configured relevance rule.
    pub fn with_relevance(mut self, predicate: impl RelevancePredicate + 'static) -> Self {
        self.deduplicator = self.deduplicator.with_relevance(predicate);
        self
    }

    fn stages(&self) -> [&dyn TableStage; 5] {
        [
            &self.projector,
            &self.deduplicator,
            &self.strings,
            &self.phones,
            &self.filler,
        ]
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// The first fatal stage error; the partially cleaned table is discarded.
    pub fn execute(&self, mut table: Table) -> Result<PipelineOutput> {
        let mut report = PipelineReport::default();
        for stage in self.stages() {
            let name = stage.stage();
            let span = info_span!("stage", stage = %name);
            table = span.in_scope(|| -> Result<Table> {
                let start = Instant::now();
                let mut stage_report = StageReport::new(name, table.len());
                let out = stage.apply(table, &mut stage_report)?;
                stage_report.rows_out = out.len();
                info!(
                    rows_in = stage_report.rows_in,
                    rows_out = stage_report.rows_out,
                    cells_changed = stage_report.cells_changed,
                    issues = stage_report.issue_count(),
                    duration_ms = start.elapsed().as_millis(),
                    "stage complete"
                );
                report.stages.push(stage_report);
                Ok(out)
            })?;
        }
        Ok(PipelineOutput { table, report })
    }
}
