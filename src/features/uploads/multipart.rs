use axum::extract::multipart::Field;
use tracing::debug;

use crate::core::error::AppError;

/// A photo part read from a multipart body, not yet validated
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Read a file part into memory
pub async fn read_photo(field: Field<'_>) -> Result<PhotoFile, AppError> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let file_name = field
        .file_name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unnamed".to_string());

    let data = field.bytes().await.map_err(|e| {
        debug!("Failed to read file bytes: {}", e);
        AppError::BadRequest(format!("Failed to read file data: {}", e))
    })?;

    Ok(PhotoFile {
        file_name,
        content_type,
        data: data.to_vec(),
    })
}

pub fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    debug!("Failed to read multipart field: {}", e);
    AppError::BadRequest(format!("Failed to read multipart data: {}", e))
}
