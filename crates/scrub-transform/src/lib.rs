//! Cleaning stages for customer tables and the pipeline that runs them.
//!
//! - **project**: split a combined column, keep or drop columns
//! - **dedupe**: relevance filter and exact duplicate removal
//! - **strings**: trimming and canonical value maps
//! - **phone**: phone numbers to `DDD-DDD-DDDD`
//! - **fill**: constant and statistic defaults for missing cells
//! - **pipeline**: the fixed stage order, with per-stage reports

pub mod dedupe;
pub mod error;
pub mod fill;
pub mod phone;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod strings;

pub use dedupe::{Deduplicator, dedupe};
pub use error::{Result, Stage, TransformError};
pub use fill::{MissingValueFiller, fill_missing, mean, median, mode};
pub use phone::{PhoneNormalization, PhoneNormalizer, normalize_phone, normalize_phone_cell, normalize_phones};
pub use pipeline::{Pipeline, PipelineOutput, TableStage};
pub use project::{ColumnProjector, project, split_value};
pub use report::{IssueKind, MAX_ISSUE_SAMPLES, PipelineReport, RowIssue, StageReport};
pub use strings::{NormalizedText, StringNormalizer, normalize_strings};
