use ingest::IngestError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] ledger_db::DbError),
    #[error("{0}")]
    Ingest(#[from] IngestError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

fn classify(err: &AppError) -> (u16, &'static str) {
    match err {
        AppError::InvalidInput(_) => (400, "invalid_input"),
        AppError::NotFound(_) => (404, "not_found"),
        AppError::Ingest(IngestError::NoFileProvided) => (400, "no_file"),
        AppError::Ingest(IngestError::MalformedInput(_)) => (422, "malformed_input"),
        AppError::Ingest(IngestError::IncompleteRow { .. }) => (422, "incomplete_row"),
        AppError::Ingest(IngestError::InvalidField { .. }) => (422, "invalid_field"),
        AppError::Ingest(IngestError::Storage(_)) | AppError::Db(_) => (500, "storage_error"),
        AppError::Io(_) | AppError::Message(_) => (500, "internal"),
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = classify(&err);
        Self {
            status,
            message: err.to_string(),
            code: Some(code.to_string()),
        }
    }
}
