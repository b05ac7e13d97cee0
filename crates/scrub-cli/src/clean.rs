//! One cleaning run: CSV in, pipeline, CSV out.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use scrub_ingest::{CsvSource, IngestStats};
use scrub_model::{ScrubConfig, TableSource};
use scrub_output::write_csv_table;
use scrub_transform::{Pipeline, PipelineOutput, PipelineReport};

use crate::logging::redact_value;

#[derive(Debug)]
pub struct CleanResult {
    pub input: PathBuf,
    /// `None` for a dry run.
    pub output: Option<PathBuf>,
    pub ingest: IngestStats,
    pub report: PipelineReport,
    pub columns: Vec<String>,
}

/// `<dir>/<stem>_clean.csv` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |stem| stem.to_string_lossy());
    input.with_file_name(format!("{stem}_clean.csv"))
}

/// Reads `input`, cleans it and writes the result unless `dry_run` is set.
///
/// # Errors
///
/// Any fatal read, configuration or write error, with the file in context.
pub fn clean_file(
    input: &Path,
    output: Option<&Path>,
    config: &ScrubConfig,
    dry_run: bool,
) -> Result<CleanResult> {
    let span = info_span!("clean", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let pipeline = Pipeline::from_config(&config.pipeline).context("build pipeline")?;
    let mut source = CsvSource::from_path(input, config.input.clone())
        .with_context(|| format!("open {}", input.display()))?;
    let raw = source
        .read_table()
        .with_context(|| format!("read {}", input.display()))?;

    let PipelineOutput { table, report } = pipeline
        .execute(raw)
        .with_context(|| format!("clean {}", input.display()))?;
    log_issue_samples(&report);

    let columns = table.columns().to_vec();
    let rows_out = table.len();
    let output = if dry_run {
        None
    } else {
        let path = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
        write_csv_table(&path, table, &config.output)
            .with_context(|| format!("write {}", path.display()))?;
        Some(path)
    };

    info!(
        rows_in = report.rows_in(),
        rows_out,
        issues = report.issue_count(),
        dry_run,
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok(CleanResult {
        input: input.to_path_buf(),
        output,
        ingest: source.stats(),
        report,
        columns,
    })
}

fn log_issue_samples(report: &PipelineReport) {
    for stage in &report.stages {
        for issue in &stage.issues {
            debug!(
                stage = %stage.stage,
                row = %issue.row,
                column = %issue.column,
                kind = issue.kind.label(),
                value = redact_value(&issue.value),
                "row issue"
            );
        }
    }
}

/// Report as JSON with customer values redacted unless data logging is on.
///
/// # Errors
///
/// Fails only if the report cannot be serialized.
pub fn report_json(report: &PipelineReport) -> Result<String> {
    let mut report = report.clone();
    for stage in &mut report.stages {
        for issue in &mut stage.issues {
            issue.value = redact_value(&issue.value).to_string();
        }
    }
    serde_json::to_string_pretty(&report).context("serialize report")
}
