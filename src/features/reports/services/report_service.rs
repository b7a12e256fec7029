use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::access::{require, Capability};
use crate::features::auth::model::Principal;
use crate::features::reports::dtos::{
    ListReportsQuery, ReportDetailResponseDto, ReportResponseDto, ReportSort,
    SubmitReportDto, SubmitReportResponseDto,
};
use crate::features::reports::mapping::{report_detail, reports_to_dtos};
use crate::features::reports::models::NewReport;
use crate::features::reports::repository::{CommentRepository, ReportRepository};
use crate::features::reports::validation::{validate_report_form, ValidatedReport};
use crate::features::uploads::multipart::PhotoFile;
use crate::features::uploads::validation::validate_photo_batch;
use crate::features::uploads::UploadService;

/// Service for report submission and retrieval
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    comments: Arc<dyn CommentRepository>,
    uploads: Arc<UploadService>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        comments: Arc<dyn CommentRepository>,
        uploads: Arc<UploadService>,
    ) -> Self {
        Self {
            reports,
            comments,
            uploads,
        }
    }

    /// Submit a report whose photos (if any) were uploaded beforehand
    pub async fn submit(
        &self,
        principal: Option<&Principal>,
        dto: SubmitReportDto,
    ) -> Result<ReportResponseDto> {
        let user = require(principal, Capability::Authenticated)?;
        let validated = validate_report_form(&dto, 0)?;

        self.create(user, dto, validated).await
    }

    /// Submit a report together with its photos.
    ///
    /// Photos are uploaded before the report is created. If creation fails the
    /// uploaded objects are removed again.
    pub async fn submit_with_photos(
        &self,
        principal: Option<&Principal>,
        mut dto: SubmitReportDto,
        photos: Vec<PhotoFile>,
    ) -> Result<SubmitReportResponseDto> {
        let user = require(principal, Capability::Authenticated)?;
        let validated = validate_report_form(&dto, photos.len())?;
        let batch = validate_photo_batch(photos, dto.images.len())?;

        let stored = self.uploads.store_photos(user, batch.accepted).await?;
        dto.images.extend(stored.iter().map(|o| o.url.clone()));

        match self.create(user, dto, validated).await {
            Ok(report) => Ok(SubmitReportResponseDto {
                report,
                warnings: batch.warnings,
            }),
            Err(e) => {
                self.uploads.discard(&stored).await;
                Err(e)
            }
        }
    }

    async fn create(
        &self,
        user: &Principal,
        dto: SubmitReportDto,
        validated: ValidatedReport,
    ) -> Result<ReportResponseDto> {
        let new = NewReport {
            title: dto.title.trim().to_string(),
            category_id: validated.category_id,
            description: dto.description.trim().to_string(),
            address: dto.address.trim().to_string(),
            geo_location: validated.location.to_pair(),
            date: dto.date.unwrap_or_else(Utc::now),
            contact: dto
                .contact
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            images: dto.images,
            status: dto.status.unwrap_or_default(),
            user_id: user.id.clone(),
        };

        let record = self
            .reports
            .create(new)
            .await
            .map_err(AppError::persistence("Failed to submit report"))?;

        info!("Report {} submitted by {}", record.id, user.id);

        record.try_into()
    }

    /// Reports created by the caller, newest first
    pub async fn list_mine(&self, principal: Option<&Principal>) -> Result<Vec<ReportResponseDto>> {
        let user = require(principal, Capability::Authenticated)?;

        let records = self
            .reports
            .list_by_user(&user.id)
            .await
            .map_err(AppError::persistence("Failed to fetch your reports"))?;

        reports_to_dtos(records)
    }

    /// All reports, optionally filtered by status and sorted by incident date
    pub async fn list_all(&self, query: &ListReportsQuery) -> Result<Vec<ReportResponseDto>> {
        let records = self
            .reports
            .list_all()
            .await
            .map_err(AppError::persistence("Failed to fetch reports"))?;

        let mut reports = reports_to_dtos(records)?;
        if let Some(status) = query.status {
            reports.retain(|r| r.status == status);
        }
        sort_by_date(&mut reports, query.sort);

        Ok(reports)
    }

    /// A report with its comment thread
    pub async fn get_detail(&self, id: Uuid) -> Result<ReportDetailResponseDto> {
        let report = self
            .reports
            .find_by_id(id)
            .await
            .map_err(AppError::persistence("Failed to fetch report"))?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        let comments = self
            .comments
            .list_for_report(id)
            .await
            .map_err(AppError::persistence("Failed to fetch report"))?;

        report_detail(report, comments)
    }
}

/// Stable sort on the incident date; reports without a date always come last
pub fn sort_by_date(reports: &mut [ReportResponseDto], sort: ReportSort) {
    reports.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => match sort {
            ReportSort::DateDesc => y.cmp(&x),
            ReportSort::DateAsc => x.cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
