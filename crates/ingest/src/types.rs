use std::fmt;

use chrono::NaiveDateTime;

/// Number of leading sheet rows that hold report metadata, not calls.
pub const HEADER_ROWS: usize = 7;

/// Positional cells a call row must provide.
pub const ROW_ARITY: usize = 7;

/// A scalar spreadsheet cell, independent of the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

/// One sheet row; `number` is the 1-based row number in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

/// Positional fields of a call row, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CallDate,
    Caller,
    Receiver,
    Duration,
    Result,
    Cost,
    Service,
}

impl Field {
    pub fn column(self) -> usize {
        match self {
            Self::CallDate => 0,
            Self::Caller => 1,
            Self::Receiver => 2,
            Self::Duration => 3,
            Self::Result => 4,
            Self::Cost => 5,
            Self::Service => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::CallDate => "call_date",
            Self::Caller => "caller",
            Self::Receiver => "receiver",
            Self::Duration => "duration",
            Self::Result => "result",
            Self::Cost => "cost",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress of a single ingestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Parsed,
    Persisting,
    Committed,
    RolledBack,
    Failed,
}

/// Errors emitted by the ingest pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("no file provided")]
    NoFileProvided,
    #[error("malformed spreadsheet: {0}")]
    MalformedInput(String),
    #[error("row {row}: expected {expected} cells, found {found}", expected = ROW_ARITY)]
    IncompleteRow { row: usize, found: usize },
    #[error("row {row}: invalid {field}: {message}")]
    InvalidField {
        row: usize,
        field: Field,
        message: String,
    },
    #[error("storage error: {0}")]
    Storage(#[from] ledger_db::DbError),
}

impl IngestError {
    /// Sheet row that caused the failure, for row-level errors.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::IncompleteRow { row, .. } | Self::InvalidField { row, .. } => Some(*row),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
