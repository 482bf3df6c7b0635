use app_api::AppContext;

/// Default request body limit for uploads.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    pub max_upload_bytes: usize,
}

impl HttpState {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
