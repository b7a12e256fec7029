use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, MaybePrincipal};
use crate::features::reports::dtos::{
    CommentResponseDto, CreateCommentDto, ListReportsQuery, ReportDetailResponseDto,
    ReportResponseDto, SubmitReportDto, SubmitReportResponseDto, SubmitReportWithPhotosForm,
};
use crate::features::reports::services::{CommentService, ReportService};
use crate::features::uploads::multipart::{multipart_error, read_photo};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub comment_service: Arc<CommentService>,
}

/// Submit a report
///
/// Photos are uploaded beforehand through `/api/uploads` and referenced in `images`.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = SubmitReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "User not authenticated"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Failed to submit report")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportState>,
    principal: MaybePrincipal,
    AppJson(dto): AppJson<SubmitReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = state.report_service.submit(principal.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// Submit a report together with its photos
///
/// Multipart form with a `report` part holding the JSON payload and one
/// `photos` part per file.
#[utoipa::path(
    post,
    path = "/api/reports/with-photos",
    request_body(
        content = SubmitReportWithPhotosForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "User not authenticated"),
        (status = 502, description = "Failed to upload photos")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn submit_report_with_photos(
    State(state): State<ReportState>,
    principal: MaybePrincipal,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    let mut report: Option<SubmitReportDto> = None;
    let mut photos = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "report" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read report field: {}", e))
                })?;
                let dto = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid JSON data: {}", e)))?;
                report = Some(dto);
            }
            "photos" => photos.push(read_photo(field).await?),
            other => debug!("Ignoring unknown field: {}", other),
        }
    }

    let dto = report.unwrap_or_default();
    let response = state
        .report_service
        .submit_with_photos(principal.as_ref(), dto, photos)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List all reports
///
/// Public. Optional status filter; sorted by incident date, undated reports last.
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 500, description = "Failed to fetch reports")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.report_service.list_all(&query).await?;
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta::total(total)),
    )))
}

/// List reports of the authenticated user
#[utoipa::path(
    get,
    path = "/api/reports/mine",
    responses(
        (status = 200, description = "List of user's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "User not authenticated")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_my_reports(
    State(state): State<ReportState>,
    principal: MaybePrincipal,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.report_service.list_mine(principal.as_ref()).await?;
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta::total(total)),
    )))
}

/// Get report by ID with its comments
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = state.report_service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Comment on a report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment added", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Comment cannot be empty"),
        (status = 401, description = "User not authenticated"),
        (status = 404, description = "Report not found")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn add_comment(
    State(state): State<ReportState>,
    principal: MaybePrincipal,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    let comment = state
        .comment_service
        .add(principal.as_ref(), id, dto)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(comment), None, None)),
    ))
}
