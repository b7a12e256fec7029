//! Conversions between repository rows and response DTOs.
//!
//! Reports are stored with their location as a `[lat, lng]` array; every read
//! reshapes it into a `GeoPoint` here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::auth::model::Principal;
use crate::features::reports::dtos::{
    CommentResponseDto, ReportDetailResponseDto, ReportResponseDto,
};
use crate::features::reports::models::{Comment, CommentRecord, ReportRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Storage order: latitude first
    pub fn to_pair(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }

    /// True for the position the form starts from before a location is chosen
    pub fn is_unset(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl TryFrom<&[f64]> for GeoPoint {
    type Error = AppError;

    fn try_from(pair: &[f64]) -> Result<Self, Self::Error> {
        match pair {
            [latitude, longitude] => Ok(GeoPoint {
                latitude: *latitude,
                longitude: *longitude,
            }),
            other => {
                tracing::error!(
                    "Stored geo location has {} entries instead of 2",
                    other.len()
                );
                Err(AppError::Internal(
                    "Stored geo location is malformed".to_string(),
                ))
            }
        }
    }
}

impl TryFrom<ReportRecord> for ReportResponseDto {
    type Error = AppError;

    fn try_from(r: ReportRecord) -> Result<Self, Self::Error> {
        let geo_location = GeoPoint::try_from(r.geo_location.as_slice())?;
        Ok(Self {
            id: r.id,
            title: r.title,
            category_id: r.category_id,
            category_name: r.category_name,
            description: r.description,
            address: r.address,
            geo_location,
            date: r.date,
            contact: r.contact,
            images: r.images,
            status: r.status,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Map a list of rows, failing on the first malformed one
pub fn reports_to_dtos(records: Vec<ReportRecord>) -> Result<Vec<ReportResponseDto>, AppError> {
    records.into_iter().map(ReportResponseDto::try_from).collect()
}

impl From<CommentRecord> for CommentResponseDto {
    fn from(c: CommentRecord) -> Self {
        Self {
            id: c.id,
            report_id: c.report_id,
            user_id: c.user_id,
            user: c.user_name,
            user_image: c.user_image,
            content: c.content,
            created_at: c.created_at,
        }
    }
}

/// A freshly created comment, with the author taken from the caller's session
pub fn comment_from_author(comment: Comment, author: &Principal) -> CommentResponseDto {
    CommentResponseDto {
        id: comment.id,
        report_id: comment.report_id,
        user_id: comment.user_id,
        user: author.name.clone(),
        user_image: author.image.clone(),
        content: comment.content,
        created_at: comment.created_at,
    }
}

pub fn report_detail(
    report: ReportRecord,
    comments: Vec<CommentRecord>,
) -> Result<ReportDetailResponseDto, AppError> {
    Ok(ReportDetailResponseDto {
        report: report.try_into()?,
        comments: comments.into_iter().map(CommentResponseDto::from).collect(),
    })
}
