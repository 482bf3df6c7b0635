mod extractor;
mod mapper;
mod pipeline;
mod types;

pub use extractor::extract_rows;
pub use mapper::{MAX_IDENTIFIER_LEN, map_row, map_rows};
pub use pipeline::{UploadedFile, ingest_upload, parse_upload};
pub use types::{
    Cell, Field, HEADER_ROWS, IngestError, IngestStage, ROW_ARITY, RawRow, Result,
};
