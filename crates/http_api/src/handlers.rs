use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use app_api::{AppContext, RecordsRequest, UploadIdRequest, UploadRequest};
use ledger_app::Result as AppResult;

use crate::{errors::HttpError, state::HttpState};

/// Multipart field carrying the spreadsheet.
pub const UPLOAD_FIELD: &str = "xmlFile";

/// Used when the file part carries no usable name.
pub const FALLBACK_FILE_NAME: &str = "upload.xlsx";

/// Runs a storage-bound call off the async runtime.
async fn blocking<T, F>(state: &HttpState, op: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&AppContext) -> AppResult<T> + Send + 'static,
{
    let context = state.context.clone();
    let value = tokio::task::spawn_blocking(move || op(&context)).await??;
    Ok(value)
}

fn bad_multipart(err: impl std::fmt::Display) -> HttpError {
    HttpError::new(
        StatusCode::BAD_REQUEST,
        format!("invalid multipart body: {}", err),
        Some("invalid_input".to_string()),
    )
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, HttpError> {
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string();
        let bytes = field.bytes().await.map_err(bad_multipart)?;
        return Ok(UploadRequest {
            file_name,
            bytes: Some(bytes.to_vec()),
        });
    }
    Ok(UploadRequest {
        file_name: FALLBACK_FILE_NAME.to_string(),
        bytes: None,
    })
}

pub async fn upload(
    State(state): State<HttpState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let req = read_upload(multipart).await?;
    let response = blocking(&state, move |ctx| app_api::upload(ctx, req)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn uploads_list(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, app_api::uploads_list).await?;
    Ok(Json(response))
}

pub async fn uploads_get(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, move |ctx| {
        app_api::uploads_get(ctx, UploadIdRequest { id })
    })
    .await?;
    Ok(Json(response))
}

pub async fn uploads_delete(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, move |ctx| {
        app_api::uploads_delete(ctx, UploadIdRequest { id })
    })
    .await?;
    Ok(Json(response))
}

pub async fn records(
    State(state): State<HttpState>,
    Query(req): Query<RecordsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, move |ctx| app_api::records(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn clear(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, app_api::records_clear).await?;
    Ok(Json(response))
}

pub async fn spending(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, app_api::spending).await?;
    Ok(Json(response))
}

pub async fn spending_for_upload(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, move |ctx| {
        app_api::spending_for_upload(ctx, UploadIdRequest { id })
    })
    .await?;
    Ok(Json(response))
}

pub async fn spending_by_service(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = blocking(&state, move |ctx| {
        app_api::spending_by_service(ctx, UploadIdRequest { id })
    })
    .await?;
    Ok(Json(response))
}

pub async fn health(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::health(&state.context)?;
    Ok(Json(response))
}
