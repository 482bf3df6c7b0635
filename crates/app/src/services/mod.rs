mod ingest;
mod records;
mod spending;
mod uploads;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use ledger_db::Db;

pub use self::ingest::{IngestService, MAX_FILE_NAME_LEN};
pub use records::RecordsService;
pub use spending::SpendingService;
pub use uploads::UploadsService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub ingest: IngestService,
    pub records: RecordsService,
    pub spending: SpendingService,
    pub uploads: UploadsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            ingest: IngestService::new(shared.clone()),
            records: RecordsService::new(shared.clone()),
            spending: SpendingService::new(shared.clone()),
            uploads: UploadsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> ledger_db::Result<Db> {
    Db::open_with_timeout(&config.db_path, config.busy_timeout)
}

fn connect(config: &SharedConfig) -> Result<Db> {
    Ok(open_db(config)?)
}
