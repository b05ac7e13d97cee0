#![deny(unsafe_code)]

use std::path::PathBuf;

use scrub_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read record {record} of {source_name}: {source}")]
    Read {
        source_name: String,
        record: u64,
        #[source]
        source: csv::Error,
    },

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("column type configured for {column}, which is not in the header of {source_name}")]
    UnknownTypedColumn { source_name: String, column: String },

    #[error("invalid header in {source_name}: {source}")]
    Header {
        source_name: String,
        #[source]
        source: ModelError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}
