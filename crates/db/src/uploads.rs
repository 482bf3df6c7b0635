use chrono::{SecondsFormat, Utc};
use ledger_core::Upload;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::Db;
use crate::error::Result;
use crate::helpers::{UPLOAD_COLUMNS, row_to_upload};

/// Inserts an upload row on `conn`, which may be an open transaction.
pub(crate) fn insert_upload(conn: &Connection, file_name: &str) -> Result<Upload> {
    let uploaded_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    conn.execute(
        "INSERT INTO uploads (file_name, upload_date) VALUES (?1, ?2)",
        params![file_name, uploaded_at],
    )?;
    Ok(Upload {
        id: conn.last_insert_rowid(),
        file_name: file_name.to_string(),
        uploaded_at,
    })
}

impl Db {
    pub fn create_upload(&self, file_name: &str) -> Result<Upload> {
        insert_upload(&self.conn, file_name)
    }

    /// Most recent first; ids break ties between uploads stamped in the same millisecond.
    pub fn list_uploads(&self) -> Result<Vec<Upload>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM uploads ORDER BY upload_date DESC, id DESC",
            UPLOAD_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], row_to_upload)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_upload(&self, id: i64) -> Result<Option<Upload>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM uploads WHERE id = ?1", UPLOAD_COLUMNS),
                params![id],
                row_to_upload,
            )
            .optional()
            .map_err(crate::error::DbError::from)
    }

    /// Removes the upload and, through the foreign key, every record it owns.
    /// Returns whether an upload row existed; a missing id is not an error.
    pub fn delete_upload(&mut self, id: i64) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM uploads WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}
