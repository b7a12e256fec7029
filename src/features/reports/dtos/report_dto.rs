use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::mapping::GeoPoint;
use crate::features::reports::models::ReportStatus;
use crate::features::reports::validation::{
    validate_description, validate_latitude, validate_location_chosen, validate_longitude,
    validate_photo_count, validate_title,
};
use crate::shared::validation::validate_not_blank;

/// Coordinates as typed into (or captured by) the report form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(
    function = "validate_location_chosen",
    message = "Please choose a location on the map"
))]
pub struct GeoLocationInput {
    #[schema(example = "48.8566")]
    #[validate(custom(
        function = "validate_latitude",
        message = "Latitude must be a number between -90 and 90"
    ))]
    pub latitude: String,
    #[schema(example = "2.3522")]
    #[validate(custom(
        function = "validate_longitude",
        message = "Longitude must be a number between -180 and 180"
    ))]
    pub longitude: String,
}

/// Request DTO for submitting a report
///
/// Missing fields read as empty so the form validation can report them.
/// Validation takes the number of photos uploaded alongside the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
#[validate(context = usize)]
pub struct SubmitReportDto {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    /// Empty string means no category was selected
    #[serde(deserialize_with = "empty_string_as_none")]
    #[validate(required(message = "Category is required"))]
    pub category_id: Option<Uuid>,
    #[validate(custom(function = "validate_description"))]
    pub description: String,
    #[validate(custom(function = "validate_not_blank", message = "Address is required"))]
    pub address: String,
    #[validate(nested)]
    pub geo_location: GeoLocationInput,
    /// Defaults to the submission time
    pub date: Option<DateTime<Utc>>,
    pub contact: Option<String>,
    /// Photo URLs returned by the upload endpoint
    #[validate(custom(function = "validate_photo_count", use_context))]
    pub images: Vec<String>,
    /// Defaults to SUBMITTED
    pub status: Option<ReportStatus>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub description: String,
    pub address: String,
    pub geo_location: GeoPoint,
    pub date: Option<DateTime<Utc>>,
    pub contact: Option<String>,
    pub images: Vec<String>,
    pub status: ReportStatus,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a submission that carried photos
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportResponseDto {
    pub report: ReportResponseDto,
    /// One message per photo that was skipped
    pub warnings: Vec<String>,
}

/// Report with its comment thread
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub comments: Vec<CommentResponseDto>,
}

/// Response DTO for comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub report_id: Uuid,
    pub user_id: String,
    /// Author display name
    pub user: String,
    pub user_image: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for adding a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(
        length(max = 2000, message = "Comment must be at most 2000 characters"),
        custom(function = "validate_not_blank", message = "Comment cannot be empty")
    )]
    pub content: String,
}

/// Sort order of the public report list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportSort {
    #[default]
    DateDesc,
    DateAsc,
}

/// Query params for the public report list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Only reports with this status
    pub status: Option<ReportStatus>,
    /// `date_desc` (default) or `date_asc`; reports without a date come last
    #[serde(default)]
    pub sort: ReportSort,
}

/// Request DTO for changing the status of a report (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Multipart form accepted by the submit-with-photos endpoint (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportWithPhotosForm {
    /// The report as JSON, same shape as `SubmitReportDto`
    pub report: SubmitReportDto,
    /// Up to five photos (JPEG or PNG, 5 MB each)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photos: Vec<String>,
}
