use ledger_core::{SpendingSummary, SpendingTotals};
use serde::Serialize;

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub upload_id: i64,
    pub records_persisted: usize,
}

#[derive(Serialize)]
pub struct SpendingReport {
    pub rows: Vec<SpendingSummary>,
    pub totals: SpendingTotals,
}

#[derive(Serialize)]
pub struct RecordCountResponse {
    pub count: u64,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
