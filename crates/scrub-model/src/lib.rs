//! Data model for the scrub cleaning pipeline.
//!
//! - **table**: `CellValue`, `Record` and `Table`
//! - **canonical**: case-insensitive canonicalization maps
//! - **relevance**: row relevance predicates
//! - **config**: serde configuration for the stages and the CSV boundary
//! - **io**: `TableSource` / `TableSink` boundary traits

pub mod canonical;
pub mod config;
pub mod error;
pub mod ids;
pub mod io;
pub mod numeric;
pub mod relevance;
pub mod table;

pub use canonical::CanonicalMap;
pub use config::{
    ColumnDefault, ColumnType, DedupeConfig, PhoneConfig, PipelineConfig, ProjectConfig,
    ScrubConfig, SinkOptions, SourceOptions, SplitSpec, StringConfig,
};
pub use error::{ModelError, Result};
pub use ids::{RowId, column_name};
pub use io::{TableSink, TableSource};
pub use numeric::{format_numeric, parse_f64};
pub use relevance::{RelevancePredicate, RelevanceRule};
pub use table::{CellValue, Record, Table};
