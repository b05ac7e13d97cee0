#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use scrub_model::{
    CellValue, ColumnType, Record, RowId, SourceOptions, Table, TableSource, parse_f64,
};

use crate::error::IngestError;

/// Counters for row-level problems recovered while reading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub blank_rows_skipped: usize,
    /// Rows with fewer fields than the header, padded with missing.
    pub short_rows: usize,
    /// Rows with more fields than the header, extra fields dropped.
    pub long_rows: usize,
    /// Numeric-typed fields that did not parse and were kept as text.
    pub unparsed_numbers: usize,
}

/// Trims the header name and strips a byte-order mark. Internal spacing is
/// part of the name and survives to the output header.
fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8, IngestError> {
    if delimiter.is_ascii() {
        u8::try_from(delimiter).map_err(|_| IngestError::InvalidDelimiter(delimiter))
    } else {
        Err(IngestError::InvalidDelimiter(delimiter))
    }
}

/// Parses one raw field. An empty field is missing; anything else is a value,
/// whitespace included.
fn parse_field(raw: &str, column_type: ColumnType) -> Option<CellValue> {
    if raw.is_empty() {
        return Some(CellValue::Missing);
    }
    match column_type {
        ColumnType::Text => Some(CellValue::text(raw)),
        ColumnType::Number => parse_f64(raw).map(CellValue::Number),
    }
}

/// Delimited-text [`TableSource`] with a header row.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    options: SourceOptions,
    source_name: String,
    stats: IngestStats,
}

impl CsvSource<File> {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened or the delimiter is not ASCII.
    pub fn from_path(path: &Path, options: SourceOptions) -> Result<Self, IngestError> {
        let delimiter = delimiter_byte(options.delimiter)?;
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|source| IngestError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            reader,
            options,
            source_name: path.display().to_string(),
            stats: IngestStats::default(),
        })
    }
}

impl<R: io::Read> CsvSource<R> {
    /// Reads from any byte stream; `source_name` is only used in messages.
    ///
    /// # Errors
    ///
    /// Fails when the delimiter is not ASCII.
    pub fn from_reader(
        reader: R,
        source_name: impl Into<String>,
        options: SourceOptions,
    ) -> Result<Self, IngestError> {
        let delimiter = delimiter_byte(options.delimiter)?;
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);
        Ok(Self {
            reader,
            options,
            source_name: source_name.into(),
            stats: IngestStats::default(),
        })
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    fn column_types(&self, headers: &[String]) -> Result<Vec<ColumnType>, IngestError> {
        if let Some(column) = self
            .options
            .column_types
            .keys()
            .find(|name| !headers.iter().any(|h| h == *name))
        {
            return Err(IngestError::UnknownTypedColumn {
                source_name: self.source_name.clone(),
                column: column.clone(),
            });
        }
        Ok(headers
            .iter()
            .map(|h| {
                self.options
                    .column_types
                    .get(h)
                    .copied()
                    .unwrap_or_default()
            })
            .collect())
    }
}

impl<R: io::Read> TableSource for CsvSource<R> {
    type Error = IngestError;

    fn read_table(&mut self) -> Result<Table, IngestError> {
        let mut records = self.reader.records();

        let Some(header) = records.next() else {
            info!(source = %self.source_name, "empty input, no header row");
            return Ok(Table::new(Vec::<String>::new())?);
        };
        let header = header.map_err(|source| IngestError::Read {
            source_name: self.source_name.clone(),
            record: 0,
            source,
        })?;
        let headers: Vec<String> = header.iter().map(normalize_header).collect();
        let mut table = Table::new(headers.clone()).map_err(|source| IngestError::Header {
            source_name: self.source_name.clone(),
            source,
        })?;
        drop(records);
        let types = self.column_types(&headers)?;

        let mut stats = IngestStats::default();
        let mut ordinal = 0u64;
        for record in self.reader.records() {
            ordinal += 1;
            let record = record.map_err(|source| IngestError::Read {
                source_name: self.source_name.clone(),
                record: ordinal,
                source,
            })?;
            if record.iter().all(str::is_empty) {
                stats.blank_rows_skipped += 1;
                continue;
            }
            let id = RowId::new(ordinal);
            if record.len() < headers.len() {
                stats.short_rows += 1;
                warn!(
                    source = %self.source_name,
                    row = %id,
                    fields = record.len(),
                    expected = headers.len(),
                    "short row padded with missing values"
                );
            } else if record.len() > headers.len() {
                stats.long_rows += 1;
                warn!(
                    source = %self.source_name,
                    row = %id,
                    fields = record.len(),
                    expected = headers.len(),
                    "long row truncated to header width"
                );
            }

            let mut cells = BTreeMap::new();
            for (idx, (name, column_type)) in headers.iter().zip(&types).enumerate() {
                let raw = record.get(idx).unwrap_or("");
                let cell = match parse_field(raw, *column_type) {
                    Some(cell) => cell,
                    None => {
                        stats.unparsed_numbers += 1;
                        debug!(row = %id, column = %name, "numeric field kept as text");
                        CellValue::text(raw)
                    }
                };
                cells.insert(name.clone(), cell);
            }
            table.push_row(Record { id, cells })?;
            stats.rows_read += 1;
        }

        info!(
            source = %self.source_name,
            rows = stats.rows_read,
            columns = table.columns().len(),
            blank_rows_skipped = stats.blank_rows_skipped,
            short_rows = stats.short_rows,
            long_rows = stats.long_rows,
            unparsed_numbers = stats.unparsed_numbers,
            "read table"
        );
        self.stats = stats;
        Ok(table)
    }
}

/// Reads a delimited file into a [`Table`].
///
/// # Errors
///
/// Fails on I/O or CSV syntax errors, invalid or duplicate header names, and
/// typed columns missing from the header. Row-level problems are recovered and
/// counted instead.
pub fn read_csv_table(path: &Path, options: &SourceOptions) -> Result<Table, IngestError> {
    CsvSource::from_path(path, options.clone())?.read_table()
}
