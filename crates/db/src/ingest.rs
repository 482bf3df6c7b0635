use ledger_core::{IngestReceipt, NewCallRecord};
use rusqlite::{Connection, TransactionBehavior};

use crate::Db;
use crate::call_records::insert_call_records;
use crate::error::{DbError, Result};
use crate::uploads::insert_upload;

fn write_upload(
    conn: &Connection,
    file_name: &str,
    records: &[NewCallRecord],
) -> Result<IngestReceipt> {
    let upload = insert_upload(conn, file_name)?;
    let records_persisted = insert_call_records(conn, Some(upload.id), records)?;
    Ok(IngestReceipt {
        upload_id: upload.id,
        records_persisted,
    })
}

impl Db {
    /// Creates the upload row and all of its records in one transaction.
    /// Either everything commits or nothing remains.
    pub fn persist_upload(
        &mut self,
        file_name: &str,
        records: &[NewCallRecord],
    ) -> Result<IngestReceipt> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        match write_upload(&tx, file_name, records) {
            Ok(receipt) => match tx.commit() {
                Ok(()) => Ok(receipt),
                Err(err) => {
                    tracing::warn!(file_name, error = %err, "commit failed");
                    Err(DbError::RolledBack {
                        source: Box::new(err.into()),
                        rollback: "commit failed; transaction rolled back".to_string(),
                    })
                }
            },
            Err(err) => {
                let rollback = match tx.rollback() {
                    Ok(()) => "transaction rolled back".to_string(),
                    Err(rollback_err) => format!("rollback failed: {}", rollback_err),
                };
                tracing::warn!(file_name, error = %err, %rollback, "upload not persisted");
                Err(DbError::RolledBack {
                    source: Box::new(err),
                    rollback,
                })
            }
        }
    }
}
