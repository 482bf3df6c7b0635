use ledger_core::{CallRecord, NewCallRecord};
use rusqlite::{Connection, TransactionBehavior, params};

use crate::Db;
use crate::error::Result;
use crate::helpers::{CALL_RECORD_COLUMNS, record_cents, row_to_call_record};
use crate::types::PageRequest;

/// Inserts every record tagged with `upload_id` on `conn`. Stops at the first
/// failure and leaves rollback to whoever owns the transaction.
pub(crate) fn insert_call_records(
    conn: &Connection,
    upload_id: Option<i64>,
    records: &[NewCallRecord],
) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO call_records (
          upload_id, call_date, caller, receiver, duration, cost_cents, service
        ) VALUES (
          ?1, ?2, ?3, ?4, ?5, ?6, ?7
        )
        "#,
    )?;
    let mut inserted = 0usize;
    for record in records {
        let cents = record_cents(record)?;
        inserted += stmt.execute(params![
            upload_id,
            record.call_date,
            record.caller,
            record.receiver,
            i64::from(record.duration_minutes),
            cents,
            record.service,
        ])?;
    }
    Ok(inserted)
}

impl Db {
    /// Batch insert in its own transaction, for records not produced by an
    /// upload ingestion. `None` leaves the records unowned.
    pub fn insert_call_records(
        &mut self,
        upload_id: Option<i64>,
        records: &[NewCallRecord],
    ) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = insert_call_records(&tx, upload_id, records)?;
        tx.commit()?;
        Ok(inserted)
    }

    pub fn call_records_page(&self, page: PageRequest) -> Result<Vec<CallRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM call_records ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            CALL_RECORD_COLUMNS
        ))?;
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(
                params![i64::from(page.page_size), offset],
                row_to_call_record,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn upload_call_records(&self, upload_id: i64) -> Result<Vec<CallRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM call_records WHERE upload_id = ?1 ORDER BY id ASC",
            CALL_RECORD_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![upload_id], row_to_call_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Counts all records, or only those owned by `upload_id`.
    pub fn count_call_records(&self, upload_id: Option<i64>) -> Result<u64> {
        let count: i64 = match upload_id {
            Some(upload_id) => self.conn.query_row(
                "SELECT COUNT(*) FROM call_records WHERE upload_id = ?1",
                params![upload_id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM call_records", [], |row| row.get(0))?,
        };
        Ok(count.max(0) as u64)
    }

    /// Deletes every call record. Upload rows are left in place.
    pub fn clear_call_records(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM call_records", [])?)
    }
}
