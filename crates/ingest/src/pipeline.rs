use ledger_core::{IngestReceipt, NewCallRecord};
use ledger_db::{Db, DbError};

use crate::extractor::extract_rows;
use crate::mapper::map_rows;
use crate::types::{IngestError, IngestStage, Result};

/// A file received for ingestion.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Extracts and maps a workbook without touching storage.
pub fn parse_upload(bytes: &[u8]) -> Result<Vec<NewCallRecord>> {
    let rows = extract_rows(bytes)?;
    map_rows(&rows)
}

/// Parses `file` and persists it as one upload.
///
/// `open_db` is only called once every row has mapped, so no connection is
/// held while the workbook is parsed. Storage failures roll the whole upload
/// back; nothing is retried.
pub fn ingest_upload<F>(file: Option<&UploadedFile>, open_db: F) -> Result<IngestReceipt>
where
    F: FnOnce() -> ledger_db::Result<Db>,
{
    let Some(file) = file.filter(|file| !file.bytes.is_empty()) else {
        return Err(IngestError::NoFileProvided);
    };
    let file_name = file.file_name.as_str();
    tracing::debug!(file_name, stage = ?IngestStage::Received, bytes = file.bytes.len());

    let records = match parse_upload(&file.bytes) {
        Ok(records) => records,
        Err(err) => {
            tracing::debug!(file_name, stage = ?IngestStage::Failed, error = %err);
            return Err(err);
        }
    };
    tracing::debug!(file_name, stage = ?IngestStage::Parsed, records = records.len());

    let persisted = open_db().and_then(|mut db| {
        tracing::debug!(file_name, stage = ?IngestStage::Persisting);
        db.persist_upload(file_name, &records)
    });
    match persisted {
        Ok(receipt) => {
            tracing::debug!(file_name, stage = ?IngestStage::Committed);
            tracing::info!(
                file_name,
                upload_id = receipt.upload_id,
                records = receipt.records_persisted,
                "upload ingested"
            );
            Ok(receipt)
        }
        Err(err) => {
            if matches!(err, DbError::RolledBack { .. }) {
                tracing::debug!(file_name, stage = ?IngestStage::RolledBack);
            }
            tracing::debug!(file_name, stage = ?IngestStage::Failed, error = %err);
            Err(IngestError::Storage(err))
        }
    }
}
