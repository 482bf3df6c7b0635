#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cost {0} is outside the storable range")]
    AmountOutOfRange(String),
    #[error("{source}; {rollback}")]
    RolledBack {
        source: Box<DbError>,
        rollback: String,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;
