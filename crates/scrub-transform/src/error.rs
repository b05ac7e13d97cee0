use std::fmt;

use serde::Serialize;
use thiserror::Error;

use scrub_model::ModelError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Project,
    Dedupe,
    Strings,
    Phones,
    Fill,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Dedupe => "dedupe",
            Self::Strings => "strings",
            Self::Phones => "phones",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal pipeline errors. Row-level data problems never end up here; they are
/// recovered inside the stage and counted in its report.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{stage}: column {column:?} does not exist at this stage")]
    UnknownColumn { stage: Stage, column: String },

    #[error("fill: column {column:?} has no values to compute the {statistic} from")]
    NoStatisticData {
        column: String,
        statistic: &'static str,
    },

    #[error("{stage}: {message}")]
    InvalidConfig { stage: Stage, message: String },

    #[error("{stage}: column {column:?} already exists")]
    ColumnConflict { stage: Stage, column: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Fails with [`TransformError::UnknownColumn`] for the first name not in `columns`.
pub(crate) fn require_columns<'a, I>(stage: Stage, columns: &[String], names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        if !columns.iter().any(|c| c == name) {
            return Err(TransformError::UnknownColumn {
                stage,
                column: name.to_string(),
            });
        }
    }
    Ok(())
}
