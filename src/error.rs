//! Tagged failure kinds shared by every engine pass.
//!
//! A transform either fully completes or fails with one of these variants
//! before producing any output; callers never see a partially rewritten table.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Raw input parsed to zero data rows.
    #[error("input contains no data rows")]
    EmptyInput,
    /// An already-loaded table carried zero rows into an engine pass.
    #[error("table contains no data rows")]
    EmptyTable,
    /// Ragged rows, a missing or empty header line, duplicate column names,
    /// or bytes that cannot be decoded with the requested encoding.
    #[error("malformed tabular input: {0}")]
    MalformedInput(String),
    /// Row ceiling tripped while parsing, before any per-cell work.
    #[error("input exceeds the maximum row limit of {limit} rows (stopped at row {actual})")]
    TooManyRows { actual: usize, limit: usize },
    /// Row ceiling tripped on a table handed directly to an engine pass.
    #[error("table contains {actual} rows, exceeding the configured ceiling of {limit}")]
    RowLimitExceeded { actual: usize, limit: usize },
    /// Domain string failed syntax validation.
    #[error("invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },
}
