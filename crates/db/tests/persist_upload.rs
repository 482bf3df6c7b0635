mod support;

use std::thread;

use ledger_core::{MAX_COST_CENTS, cents_to_cost};
use ledger_db::{Db, DbError};
use rusqlite::Connection;
use support::{make_record, setup_db};

#[test]
fn persist_upload_tags_every_record() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let receipt = db
        .persist_upload(
            "calls.xlsx",
            &[make_record("111", 10, 0), make_record("111", 5, 250)],
        )
        .expect("persist");

    assert_eq!(receipt.records_persisted, 2);
    let upload = db
        .get_upload(receipt.upload_id)
        .expect("lookup")
        .expect("upload");
    assert_eq!(upload.file_name, "calls.xlsx");
    let records = db.upload_call_records(receipt.upload_id).expect("records");
    assert!(records.iter().all(|r| r.upload_id == Some(receipt.upload_id)));
}

#[test]
fn persist_upload_with_no_records_still_creates_upload() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let receipt = db.persist_upload("empty.xlsx", &[]).expect("persist");
    assert_eq!(receipt.records_persisted, 0);
    assert_eq!(db.list_uploads().expect("uploads").len(), 1);
}

#[test]
fn failed_record_rolls_back_upload_and_earlier_records() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let mut oversized = make_record("111", 1, 0);
    oversized.cost = cents_to_cost(MAX_COST_CENTS + 1);

    let err = db
        .persist_upload("calls.xlsx", &[make_record("111", 1, 0), oversized])
        .expect_err("should fail");

    match err {
        DbError::RolledBack { source, rollback } => {
            assert!(matches!(*source, DbError::AmountOutOfRange(_)));
            assert_eq!(rollback, "transaction rolled back");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(db.list_uploads().expect("uploads").is_empty());
    assert_eq!(db.count_call_records(None).expect("count"), 0);
}

#[test]
fn storage_constraint_failure_leaves_no_trace() {
    let mut test_db = setup_db();
    {
        let conn = Connection::open(&test_db.path).expect("open conn");
        conn.execute_batch(
            r#"
            CREATE TRIGGER reject_caller BEFORE INSERT ON call_records
            WHEN NEW.caller = 'reject'
            BEGIN
              SELECT RAISE(ABORT, 'caller rejected');
            END;
            "#,
        )
        .expect("create trigger");
    }
    let db = &mut test_db.db;

    let err = db
        .persist_upload(
            "calls.xlsx",
            &[make_record("111", 1, 0), make_record("reject", 1, 0)],
        )
        .expect_err("should fail");

    assert!(err.to_string().contains("caller rejected"));
    assert!(err.to_string().contains("rolled back"));
    assert!(db.list_uploads().expect("uploads").is_empty());
    assert_eq!(db.count_call_records(None).expect("count"), 0);
}

#[test]
fn concurrent_uploads_do_not_interleave_records() {
    let test_db = setup_db();
    let path = test_db.path.clone();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let mut db = Db::open(&path).expect("open db");
                let caller = format!("caller-{worker}");
                let records: Vec<_> = (0..25).map(|i| make_record(&caller, i, 0)).collect();
                let receipt = db
                    .persist_upload(&format!("file-{worker}.xlsx"), &records)
                    .expect("persist");
                (caller, receipt)
            })
        })
        .collect();

    for handle in handles {
        let (caller, receipt) = handle.join().expect("join");
        assert_eq!(receipt.records_persisted, 25);
        let records = test_db
            .db
            .upload_call_records(receipt.upload_id)
            .expect("records");
        assert_eq!(records.len(), 25);
        assert!(records.iter().all(|r| r.caller == caller));
    }
    assert_eq!(test_db.db.list_uploads().expect("uploads").len(), 4);
}
