use thiserror::Error;

use crate::RowId;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid column name: {0:?}")]
    InvalidColumnName(String),
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("row {row} does not match the table columns: {detail}")]
    RowShape { row: RowId, detail: String },
    #[error("canonical key {key:?} maps to both {first:?} and {second:?}")]
    ConflictingCanonical {
        key: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
