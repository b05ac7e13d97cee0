#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Validates and normalizes a column name: trimmed, non-empty.
pub fn column_name(value: impl Into<String>) -> Result<String, ModelError> {
    let value = value.into();
    let trimmed = value.trim().trim_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(ModelError::InvalidColumnName(value));
    }
    Ok(trimmed.to_string())
}

/// Position of a record in its source, 1-based, header excluded.
///
/// Stages never renumber rows, so the id of a cleaned row still points at the
/// raw line it came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    pub fn new(ordinal: u64) -> Self {
        Self(ordinal)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
