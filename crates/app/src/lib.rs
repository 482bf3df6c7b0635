pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;

pub use app::{AppConfig, AppState};
pub use config::PageParams;
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, MAX_FILE_NAME_LEN};
pub use startup::{AppPaths, DB_FILE_NAME, ensure_app_data_dir};
