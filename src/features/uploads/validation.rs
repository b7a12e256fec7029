use crate::core::error::AppError;
use crate::features::uploads::multipart::PhotoFile;
use crate::shared::constants::{ALLOWED_PHOTO_MIME_TYPES, MAX_PHOTO_SIZE, MAX_REPORT_PHOTOS};

/// Photos that passed validation, plus one warning per skipped file
#[derive(Debug, Default)]
pub struct PhotoBatch {
    pub accepted: Vec<PhotoFile>,
    pub warnings: Vec<String>,
}

pub fn is_photo_mime_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    ALLOWED_PHOTO_MIME_TYPES.contains(&content_type.as_str())
}

/// Extension used for the stored object
pub fn photo_extension(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        _ => "jpg",
    }
}

/// Validate a batch of photos.
///
/// More than the allowed number of photos (counting `already_attached`) rejects
/// the whole batch. Otherwise each file with a wrong type or size is skipped
/// with a warning and the rest are accepted.
pub fn validate_photo_batch(
    files: Vec<PhotoFile>,
    already_attached: usize,
) -> Result<PhotoBatch, AppError> {
    if files.len() + already_attached > MAX_REPORT_PHOTOS {
        return Err(AppError::InvalidFields(vec![format!(
            "You can attach at most {} photos",
            MAX_REPORT_PHOTOS
        )]));
    }

    let mut batch = PhotoBatch::default();
    for file in files {
        if !is_photo_mime_type(&file.content_type) {
            batch.warnings.push(format!(
                "{}: only JPEG and PNG images are accepted",
                file.file_name
            ));
        } else if file.data.len() > MAX_PHOTO_SIZE {
            batch.warnings.push(format!(
                "{}: file is larger than {} MB",
                file.file_name,
                MAX_PHOTO_SIZE / 1024 / 1024
            ));
        } else {
            batch.accepted.push(file);
        }
    }

    Ok(batch)
}
