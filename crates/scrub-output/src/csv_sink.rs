#![deny(unsafe_code)]

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use scrub_model::{SinkOptions, Table, TableSink};

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush output: {0}")]
    Io(#[from] io::Error),

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("rendered output is not valid UTF-8")]
    Utf8,
}

fn delimiter_byte(delimiter: char) -> Result<u8, OutputError> {
    if delimiter.is_ascii() {
        u8::try_from(delimiter).map_err(|_| OutputError::InvalidDelimiter(delimiter))
    } else {
        Err(OutputError::InvalidDelimiter(delimiter))
    }
}

/// Delimited-text [`TableSink`]: header row, then one line per record.
///
/// Columns follow the table's order; missing cells are written as empty fields.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Wraps any byte sink.
    ///
    /// # Errors
    ///
    /// Fails when the delimiter is not ASCII.
    pub fn new(writer: W, options: &SinkOptions) -> Result<Self, OutputError> {
        let writer = WriterBuilder::new()
            .delimiter(delimiter_byte(options.delimiter)?)
            .from_writer(writer);
        Ok(Self { writer })
    }

    fn write_rows(&mut self, table: &Table) -> Result<(), OutputError> {
        if table.columns().is_empty() {
            return Ok(());
        }
        self.writer.write_record(table.columns())?;
        for row in table.rows() {
            self.writer
                .write_record(table.columns().iter().map(|c| row.get(c).render().into_owned()))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, OutputError> {
        self.writer
            .into_inner()
            .map_err(|err| OutputError::Io(err.into_error()))
    }
}

impl<W: Write> TableSink for CsvSink<W> {
    type Error = OutputError;

    fn write_table(&mut self, table: Table) -> Result<(), OutputError> {
        self.write_rows(&table)
    }
}

/// Renders a table to a string, mostly for previews and tests.
///
/// # Errors
///
/// Fails when the delimiter is not ASCII.
pub fn render_csv(table: &Table, options: &SinkOptions) -> Result<String, OutputError> {
    let mut sink = CsvSink::new(Vec::new(), options)?;
    sink.write_rows(table)?;
    let bytes = sink.into_inner()?;
    String::from_utf8(bytes).map_err(|_| OutputError::Utf8)
}

/// Writes a table to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Fails when the file cannot be created or written.
pub fn write_csv_table(path: &Path, table: Table, options: &SinkOptions) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = table.len();
    let columns = table.columns().len();
    let mut sink = CsvSink::new(file, options)?;
    sink.write_table(table)?;
    info!(path = %path.display(), rows, columns, "wrote table");
    Ok(())
}
