use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct RecordsRequest {
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UploadIdRequest {
    pub id: i64,
}

#[derive(Debug)]
pub struct UploadRequest {
    pub file_name: String,
    /// `None` when the caller sent no file part at all.
    pub bytes: Option<Vec<u8>>,
}
