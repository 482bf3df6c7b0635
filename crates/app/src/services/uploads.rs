use crate::error::{AppError, Result};
use crate::services::{SharedConfig, connect};
use ledger_core::Upload;
use ledger_db::Db;

#[derive(Clone)]
pub struct UploadsService {
    config: SharedConfig,
}

impl UploadsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        connect(&self.config)
    }

    /// Newest upload first.
    pub fn list(&self) -> Result<Vec<Upload>> {
        let db = self.db()?;
        Ok(db.list_uploads()?)
    }

    pub fn get(&self, id: i64) -> Result<Upload> {
        let db = self.db()?;
        db.get_upload(id)?
            .ok_or_else(|| AppError::NotFound(format!("upload {} not found", id)))
    }

    /// Removes the upload and its records. Unknown ids succeed and return
    /// `false`.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let mut db = self.db()?;
        match db.delete_upload(id) {
            Ok(deleted) => {
                if deleted {
                    tracing::info!(upload_id = id, "upload deleted");
                }
                Ok(deleted)
            }
            Err(err) => {
                tracing::warn!(upload_id = id, error = %err, "delete upload failed");
                Err(err.into())
            }
        }
    }
}
