use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::{AppJson, MaybePrincipal};
use crate::features::uploads::dtos::{
    DeletePhotosDto, DeletePhotosResponseDto, UploadPhotosForm, UploadPhotosResponseDto,
};
use crate::features::uploads::multipart::{multipart_error, read_photo};
use crate::features::uploads::services::UploadService;
use crate::shared::types::ApiResponse;

/// Upload report photos
///
/// Accepts multipart/form-data with one `photos` part per file. Files with a
/// wrong type or size are skipped and reported in `warnings`.
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    request_body(
        content = UploadPhotosForm,
        content_type = "multipart/form-data",
        description = "Up to five JPEG or PNG photos, 5 MB each",
    ),
    responses(
        (status = 201, description = "Photos uploaded", body = ApiResponse<UploadPhotosResponseDto>),
        (status = 400, description = "Too many photos or malformed form"),
        (status = 401, description = "User not authenticated"),
        (status = 502, description = "Failed to upload photos")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn upload_photos(
    State(service): State<Arc<UploadService>>,
    principal: MaybePrincipal,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadPhotosResponseDto>>), AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "photos" | "file" => files.push(read_photo(field).await?),
            other => debug!("Ignoring unknown field: {}", other),
        }
    }

    let response = service.upload_photos(principal.as_ref(), files).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Delete report photos by URL
///
/// Only the owner of a photo or an admin can delete it.
#[utoipa::path(
    delete,
    path = "/api/uploads",
    tag = "uploads",
    request_body = DeletePhotosDto,
    responses(
        (status = 200, description = "Photos deleted", body = ApiResponse<DeletePhotosResponseDto>),
        (status = 400, description = "Unknown photo URL"),
        (status = 401, description = "User not authenticated"),
        (status = 403, description = "Not allowed to delete this photo")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn delete_photos(
    State(service): State<Arc<UploadService>>,
    principal: MaybePrincipal,
    AppJson(dto): AppJson<DeletePhotosDto>,
) -> Result<Json<ApiResponse<DeletePhotosResponseDto>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.delete_photos(principal.as_ref(), dto.urls).await?;

    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Photos deleted successfully".to_string()),
        None,
    )))
}
