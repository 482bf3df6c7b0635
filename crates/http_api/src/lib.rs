mod errors;
mod handlers;
mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

pub use errors::HttpError;
pub use handlers::{FALLBACK_FILE_NAME, UPLOAD_FIELD};
pub use state::{DEFAULT_MAX_UPLOAD_BYTES, HttpState};

pub fn router(state: HttpState) -> Router<()> {
    let upload = Router::new()
        .route("/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .merge(upload)
        .route("/uploads", get(handlers::uploads_list))
        .route(
            "/uploads/:id",
            get(handlers::uploads_get).delete(handlers::uploads_delete),
        )
        .route("/data", get(handlers::records))
        .route("/analyze/spending", get(handlers::spending))
        .route("/analyze/spending/:id", get(handlers::spending_for_upload))
        .route(
            "/analyze/spending/:id/services",
            get(handlers::spending_by_service),
        )
        .route("/clear", post(handlers::clear).get(handlers::clear))
        .route("/health", get(handlers::health))
        .with_state(state)
}
