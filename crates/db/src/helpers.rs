use ledger_core::{CallRecord, NewCallRecord, Upload, cents_to_cost, cost_to_cents};
use rusqlite::Row;

use crate::error::{DbError, Result};

pub(crate) const UPLOAD_COLUMNS: &str = "id, file_name, upload_date";

pub(crate) const CALL_RECORD_COLUMNS: &str =
    "id, upload_id, call_date, caller, receiver, duration, cost_cents, service";

pub(crate) fn row_to_upload(row: &Row<'_>) -> std::result::Result<Upload, rusqlite::Error> {
    Ok(Upload {
        id: row.get(0)?,
        file_name: row.get(1)?,
        uploaded_at: row.get(2)?,
    })
}

pub(crate) fn row_to_call_record(
    row: &Row<'_>,
) -> std::result::Result<CallRecord, rusqlite::Error> {
    Ok(CallRecord {
        id: row.get(0)?,
        upload_id: row.get(1)?,
        call_date: row.get(2)?,
        caller: row.get(3)?,
        receiver: row.get(4)?,
        duration_minutes: row.get::<_, i64>(5)?.max(0) as u32,
        cost: cents_to_cost(row.get(6)?),
        service: row.get(7)?,
    })
}

pub(crate) fn record_cents(record: &NewCallRecord) -> Result<i64> {
    cost_to_cents(&record.cost).ok_or_else(|| DbError::AmountOutOfRange(record.cost.to_string()))
}
