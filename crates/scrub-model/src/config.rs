//! Configuration for the cleaning pipeline and its CSV boundary.
//!
//! Everything here is plain serde data, loaded once before a run and read-only
//! afterwards. The stage-level checks (does a named column exist?) happen when
//! each stage runs, because the column set changes along the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CanonicalMap;
use crate::relevance::RelevanceRule;

/// How a source column is typed when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
}

/// Options for reading the raw delimited file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceOptions {
    /// Field delimiter (single ASCII character).
    pub delimiter: char,
    /// Columns parsed as numbers; all others stay text.
    pub column_types: BTreeMap<String, ColumnType>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            column_types: BTreeMap::new(),
        }
    }
}

impl SourceOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_column_type(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.column_types.insert(column.into(), column_type);
        self
    }
}

/// Options for writing the cleaned delimited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkOptions {
    pub delimiter: char,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

/// Splits one combined column into several atomic columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitSpec {
    pub source: String,
    pub separator: String,
    pub into: Vec<String>,
    /// Keep the combined column next to its parts.
    #[serde(default)]
    pub keep_source: bool,
}

impl SplitSpec {
    pub fn new<I, S>(source: impl Into<String>, separator: impl Into<String>, into: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into(),
            separator: separator.into(),
            into: into.into_iter().map(Into::into).collect(),
            keep_source: false,
        }
    }
}

/// Column projection: either a keep-list or a drop-list, plus an optional split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Columns that survive; everything else is dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep: Option<Vec<String>>,
    /// Columns removed when no keep-list is given.
    pub drop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DedupeConfig {
    /// Columns compared for duplicates; all columns when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RelevanceRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringConfig {
    pub columns: Vec<String>,
    /// Collapse runs of internal whitespace to one space. Off by default.
    pub collapse_whitespace: bool,
    /// Turn values that are empty after trimming into missing.
    pub blank_as_missing: bool,
    /// Characters stripped from both ends after whitespace trimming, keyed by column.
    pub strip_chars: BTreeMap<String, String>,
    /// Canonical value maps keyed by column.
    pub canonical: BTreeMap<String, CanonicalMap>,
}

impl Default for StringConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            collapse_whitespace: false,
            blank_as_missing: true,
            strip_chars: BTreeMap::new(),
            canonical: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhoneConfig {
    pub columns: Vec<String>,
}

/// How a missing cell in a column gets its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum ColumnDefault {
    Text { value: String },
    Number { value: f64 },
    Median,
    Mean,
    Mode,
}

impl ColumnDefault {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// True for defaults computed from the column's own values.
    pub fn is_statistic(&self) -> bool {
        matches!(self, Self::Median | Self::Mean | Self::Mode)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Number { .. } => "number",
            Self::Median => "median",
            Self::Mean => "mean",
            Self::Mode => "mode",
        }
    }
}

/// Stage configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub project: ProjectConfig,
    pub dedupe: DedupeConfig,
    pub strings: StringConfig,
    pub phones: PhoneConfig,
    /// Missing-value rules keyed by column.
    pub fill: BTreeMap<String, ColumnDefault>,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cleanup of the customer call-list export.
    ///
    /// Expects the columns `CustomerID`, `First_Name`, `Last_Name`,
    /// `Phone_Number`, `Address`, `Paying Customer`, `Do_Not_Contact` and
    /// `Not_Useful_Column`.
    pub fn customer_call_list() -> Self {
        let yes_no = CanonicalMap::yes_no();
        let mut canonical = BTreeMap::new();
        canonical.insert("Paying Customer".to_string(), yes_no.clone());
        canonical.insert("Do_Not_Contact".to_string(), yes_no);

        let mut fill = BTreeMap::new();
        for column in [
            "First_Name",
            "Last_Name",
            "Street_Address",
            "State",
            "Zip_Code",
            "Paying Customer",
            "Do_Not_Contact",
        ] {
            fill.insert(column.to_string(), ColumnDefault::text(""));
        }

        Self {
            project: ProjectConfig {
                keep: None,
                drop: vec!["Not_Useful_Column".to_string()],
                split: Some(SplitSpec::new(
                    "Address",
                    ",",
                    ["Street_Address", "State", "Zip_Code"],
                )),
            },
            dedupe: DedupeConfig {
                key_columns: None,
                relevance: Some(RelevanceRule::NoneOf {
                    column: "Do_Not_Contact".to_string(),
                    values: vec!["Y".to_string(), "Yes".to_string()],
                }),
            },
            strings: StringConfig {
                columns: vec![
                    "First_Name".to_string(),
                    "Last_Name".to_string(),
                    "Street_Address".to_string(),
                    "State".to_string(),
                    "Zip_Code".to_string(),
                ],
                strip_chars: BTreeMap::from([("Last_Name".to_string(), "._/".to_string())]),
                canonical,
                ..StringConfig::default()
            },
            phones: PhoneConfig {
                columns: vec!["Phone_Number".to_string()],
            },
            fill,
        }
    }
}

/// Full run configuration as stored in a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrubConfig {
    pub input: SourceOptions,
    pub output: SinkOptions,
    pub pipeline: PipelineConfig,
}

impl ScrubConfig {
    pub fn customer_call_list() -> Self {
        Self {
            input: SourceOptions::default(),
            output: SinkOptions::default(),
            pipeline: PipelineConfig::customer_call_list(),
        }
    }
}
