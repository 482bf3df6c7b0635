#![allow(dead_code)]

use std::path::PathBuf;

use ledger_core::{NewCallRecord, cents_to_cost};
use ledger_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn make_record(caller: &str, minutes: u32, cost_cents: i64) -> NewCallRecord {
    make_service_record(caller, minutes, cost_cents, "voice")
}

pub fn make_service_record(
    caller: &str,
    minutes: u32,
    cost_cents: i64,
    service: &str,
) -> NewCallRecord {
    NewCallRecord {
        call_date: "2024-01-01 00:00:00".to_string(),
        caller: caller.to_string(),
        receiver: "222".to_string(),
        duration_minutes: minutes,
        cost: cents_to_cost(cost_cents),
        service: service.to_string(),
    }
}
