//! Table output: writes cleaned [`scrub_model::Table`]s as delimited text.

mod csv_sink;

pub use csv_sink::{CsvSink, OutputError, render_csv, write_csv_table};
