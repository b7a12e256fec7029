use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::uploads::handlers::{delete_photos, upload_photos};
use crate::features::uploads::services::UploadService;
use crate::shared::constants::{MAX_PHOTO_SIZE, MAX_REPORT_PHOTOS};

/// Body limit for a full batch plus multipart overhead
pub const PHOTO_BATCH_BODY_LIMIT: usize = MAX_PHOTO_SIZE * MAX_REPORT_PHOTOS + 1024 * 1024;

/// Create routes for the uploads feature
pub fn routes(service: Arc<UploadService>) -> Router {
    Router::new()
        .route(
            "/api/uploads",
            post(upload_photos)
                .layer(DefaultBodyLimit::max(PHOTO_BATCH_BODY_LIMIT))
                .delete(delete_photos),
        )
        .with_state(service)
}
