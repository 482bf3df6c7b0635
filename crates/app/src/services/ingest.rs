use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};
use ingest::UploadedFile;
use ledger_core::IngestReceipt;

/// Longest file name the uploads table accepts.
pub const MAX_FILE_NAME_LEN: usize = 255;

#[derive(Clone)]
pub struct IngestService {
    config: SharedConfig,
}

impl IngestService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Parses and stores one file as a single upload.
    pub fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<IngestReceipt> {
        let file_name = validate_file_name(file_name)?;
        let file = UploadedFile::new(file_name, bytes);
        self.ingest(Some(&file))
    }

    pub fn ingest(&self, file: Option<&UploadedFile>) -> Result<IngestReceipt> {
        Ok(ingest::ingest_upload(file, || open_db(&self.config))?)
    }
}

fn validate_file_name(file_name: &str) -> Result<String> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("file name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_FILE_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "file name exceeds {} characters",
            MAX_FILE_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}
