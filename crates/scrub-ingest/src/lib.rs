//! Table ingestion: reads raw delimited files into [`scrub_model::Table`]s.

pub mod csv_source;
pub mod error;

pub use csv_source::{CsvSource, IngestStats, read_csv_table};
pub use error::IngestError;
