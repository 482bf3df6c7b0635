use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::services::AppServices;
use ledger_db::{DEFAULT_BUSY_TIMEOUT, Db};

/// Storage settings shared by every service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Upper bound on waiting for a locked database.
    pub busy_timeout: Duration,
}

/// Application state shared by frontends (HTTP server, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self::with_busy_timeout(db_path, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn with_busy_timeout(db_path: PathBuf, busy_timeout: Duration) -> Self {
        let config = AppConfig {
            db_path,
            busy_timeout,
        };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path, self.config.busy_timeout)
    }

    pub fn initialize(&self) -> Result<()> {
        let is_fresh_db = self.is_fresh_db();
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))?;
        if is_fresh_db {
            tracing::info!(path = %self.config.db_path.display(), "created database");
        }
        Ok(())
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open_with_timeout(
            &self.config.db_path,
            self.config.busy_timeout,
        )?)
    }
}

pub fn setup_db(path: &Path, busy_timeout: Duration) -> Result<()> {
    let mut db = Db::open_with_timeout(path, busy_timeout)?;
    db.migrate()?;
    Ok(())
}
