//! In-memory table model and the loader that builds it from raw bytes.
//!
//! A [`Table`] is an ordered header plus rows of text cells, immutable once
//! built. Loading is a pure parse: the caller hands in the bytes, and no file
//! or network access happens here. The row ceiling is enforced while parsing,
//! before any per-cell matching work, so worst-case cost is bounded by the
//! configured limit rather than the input size.

use std::collections::HashSet;
use std::io::Write;

use encoding_rs::Encoding;

use crate::{error::EngineError, io_utils};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from pre-parsed parts, enforcing the shape invariants
    /// (unique column names, every row exactly as wide as the header).
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, EngineError> {
        validate_columns(&columns)?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(EngineError::MalformedInput(format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Parses raw CSV bytes into a table.
    ///
    /// Fails with [`EngineError::EmptyInput`] when no data rows follow the
    /// header, [`EngineError::MalformedInput`] on ragged rows or a bad header,
    /// and [`EngineError::TooManyRows`] as soon as the count passes
    /// `row_limit`.
    pub fn load(
        bytes: &[u8],
        delimiter: u8,
        encoding: &'static Encoding,
        row_limit: usize,
    ) -> Result<Self, EngineError> {
        let mut reader = io_utils::open_csv_reader(bytes, delimiter);
        let headers = reader
            .byte_headers()
            .map_err(|err| EngineError::MalformedInput(err.to_string()))?
            .clone();
        let columns =
            io_utils::decode_record(&headers, encoding).map_err(EngineError::MalformedInput)?;
        validate_columns(&columns)?;

        let mut rows = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            if rows.len() >= row_limit {
                return Err(EngineError::TooManyRows {
                    actual: idx + 1,
                    limit: row_limit,
                });
            }
            let record = record.map_err(|err| {
                EngineError::MalformedInput(format!("row {}: {err}", idx + 2))
            })?;
            let decoded =
                io_utils::decode_record(&record, encoding).map_err(EngineError::MalformedInput)?;
            rows.push(decoded);
        }

        if rows.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        Self::from_parts(columns, rows)
    }

    /// Defensive re-check used by the engine passes.
    pub fn ensure_not_empty(&self) -> Result<(), EngineError> {
        if self.rows.is_empty() {
            Err(EngineError::EmptyTable)
        } else {
            Ok(())
        }
    }

    /// Enforces the configured row ceiling before any per-cell work begins.
    pub fn ensure_within_limit(&self, limit: usize) -> Result<(), EngineError> {
        if self.rows.len() > limit {
            Err(EngineError::RowLimitExceeded {
                actual: self.rows.len(),
                limit,
            })
        } else {
            Ok(())
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell text at (`row`, `column`); empty string when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Iterates one column's cells top to bottom.
    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(column).map(String::as_str).unwrap_or(""))
    }

    /// Serializes the header row then every data row, quoting all fields.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> anyhow::Result<()> {
        let mut csv_writer = io_utils::csv_writer_builder(delimiter).from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self, delimiter: u8) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, delimiter)?;
        Ok(buffer)
    }
}

fn validate_columns(columns: &[String]) -> Result<(), EngineError> {
    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(EngineError::MalformedInput(
            "header line is missing or empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(EngineError::MalformedInput(format!(
                "duplicate column name '{column}'"
            )));
        }
    }
    Ok(())
}
