use crate::config::PageParams;
use crate::error::Result;
use crate::services::{SharedConfig, connect};
use ledger_core::CallRecord;
use ledger_db::Db;

#[derive(Clone)]
pub struct RecordsService {
    config: SharedConfig,
}

impl RecordsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        connect(&self.config)
    }

    pub fn page(&self, params: &PageParams) -> Result<Vec<CallRecord>> {
        let db = self.db()?;
        Ok(db.call_records_page(params.to_page_request())?)
    }

    pub fn count(&self, upload_id: Option<i64>) -> Result<u64> {
        let db = self.db()?;
        Ok(db.count_call_records(upload_id)?)
    }

    /// Deletes every call record; uploads stay.
    pub fn clear(&self) -> Result<usize> {
        let db = self.db()?;
        match db.clear_call_records() {
            Ok(removed) => {
                tracing::info!(removed, "call records cleared");
                Ok(removed)
            }
            Err(err) => {
                tracing::warn!(error = %err, "clear call records failed");
                Err(err.into())
            }
        }
    }
}
