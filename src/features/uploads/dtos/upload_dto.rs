use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::storage::StoredObject;

/// Multipart upload form (documentation only, the handler reads `Multipart` directly)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotosForm {
    /// Up to five photos (JPEG or PNG, 5 MB each), one `photos` part per file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photos: Vec<String>,
}

/// Result of a photo upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadPhotosResponseDto {
    pub files: Vec<StoredObject>,
    /// One message per file that was skipped
    pub warnings: Vec<String>,
}

/// Request DTO for deleting photos by URL
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeletePhotosDto {
    #[validate(length(min = 1, max = 5, message = "Between 1 and 5 URLs are required"))]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletePhotosResponseDto {
    pub deleted: usize,
}
