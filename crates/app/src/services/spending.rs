use crate::error::Result;
use crate::services::{SharedConfig, connect};
use ledger_core::SpendingSummary;
use ledger_db::Db;

#[derive(Clone)]
pub struct SpendingService {
    config: SharedConfig,
}

impl SpendingService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        connect(&self.config)
    }

    pub fn all(&self) -> Result<Vec<SpendingSummary>> {
        let db = self.db()?;
        Ok(db.spending_summary()?)
    }

    /// Unknown upload ids yield an empty summary.
    pub fn for_upload(&self, upload_id: i64) -> Result<Vec<SpendingSummary>> {
        let db = self.db()?;
        Ok(db.spending_summary_for_upload(upload_id)?)
    }

    pub fn by_service(&self, upload_id: i64) -> Result<Vec<SpendingSummary>> {
        let db = self.db()?;
        Ok(db.spending_by_service_for_upload(upload_id)?)
    }
}
