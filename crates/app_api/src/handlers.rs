use ingest::UploadedFile;
use ledger_app::{PageParams, Result};
use ledger_core::{CallRecord, SpendingSummary, Upload, spending_totals};

use crate::{
    AppContext, ClearedResponse, DeletedResponse, OkResponse, RecordCountResponse,
    RecordsRequest, SpendingReport, UploadIdRequest, UploadRequest, UploadResponse,
};

fn report(rows: Vec<SpendingSummary>) -> SpendingReport {
    let totals = spending_totals(&rows);
    SpendingReport { rows, totals }
}

pub fn upload(ctx: &AppContext, req: UploadRequest) -> Result<UploadResponse> {
    let ingest = &ctx.app_state.services.ingest;
    let receipt = match req.bytes {
        Some(bytes) => ingest.upload(&req.file_name, bytes)?,
        None => ingest.ingest(None::<&UploadedFile>)?,
    };
    Ok(UploadResponse {
        message: "File uploaded and data saved".to_string(),
        upload_id: receipt.upload_id,
        records_persisted: receipt.records_persisted,
    })
}

pub fn uploads_list(ctx: &AppContext) -> Result<Vec<Upload>> {
    ctx.app_state.services.uploads.list()
}

pub fn uploads_get(ctx: &AppContext, req: UploadIdRequest) -> Result<Upload> {
    ctx.app_state.services.uploads.get(req.id)
}

pub fn uploads_delete(ctx: &AppContext, req: UploadIdRequest) -> Result<DeletedResponse> {
    let deleted = ctx.app_state.services.uploads.delete(req.id)?;
    Ok(DeletedResponse { deleted })
}

pub fn records(ctx: &AppContext, req: RecordsRequest) -> Result<Vec<CallRecord>> {
    let params = PageParams {
        page: req.page,
        page_size: req.limit,
    };
    ctx.app_state.services.records.page(&params)
}

pub fn records_count(ctx: &AppContext, upload_id: Option<i64>) -> Result<RecordCountResponse> {
    let count = ctx.app_state.services.records.count(upload_id)?;
    Ok(RecordCountResponse { count })
}

pub fn records_clear(ctx: &AppContext) -> Result<ClearedResponse> {
    let cleared = ctx.app_state.services.records.clear()?;
    Ok(ClearedResponse { cleared })
}

pub fn spending(ctx: &AppContext) -> Result<SpendingReport> {
    Ok(report(ctx.app_state.services.spending.all()?))
}

pub fn spending_for_upload(ctx: &AppContext, req: UploadIdRequest) -> Result<SpendingReport> {
    Ok(report(ctx.app_state.services.spending.for_upload(req.id)?))
}

pub fn spending_by_service(ctx: &AppContext, req: UploadIdRequest) -> Result<SpendingReport> {
    Ok(report(ctx.app_state.services.spending.by_service(req.id)?))
}

pub fn health(_ctx: &AppContext) -> Result<OkResponse> {
    Ok(OkResponse { ok: true })
}
