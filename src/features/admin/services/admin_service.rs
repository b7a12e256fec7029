use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    AdminReportPageDto, AdminReportsQuery, ReportStatsDto, StatusCounts,
};
use crate::features::admin::filter::{category_names, paginate, DashboardFilter};
use crate::features::auth::access::{require, Capability};
use crate::features::auth::model::Principal;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::mapping::reports_to_dtos;
use crate::features::reports::models::ReportStatus;
use crate::features::reports::repository::ReportRepository;
use crate::shared::constants::ADMIN_REPORTS_PAGE_SIZE;
use crate::shared::types::Meta;

/// Service for the admin dashboard
pub struct AdminService {
    reports: Arc<dyn ReportRepository>,
}

impl AdminService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    async fn all_reports(&self) -> Result<Vec<ReportResponseDto>> {
        let records = self
            .reports
            .list_all()
            .await
            .map_err(AppError::persistence("Failed to fetch report statistics"))?;

        reports_to_dtos(records)
    }

    /// Every report plus per-status counts
    pub async fn report_stats(&self, principal: Option<&Principal>) -> Result<ReportStatsDto> {
        require(principal, Capability::Admin)?;

        let reports = self.all_reports().await?;
        let reports_by_status: StatusCounts = reports.iter().map(|r| r.status).collect();

        Ok(ReportStatsDto {
            total_reports: reports_by_status.total(),
            reports_by_status,
            reports,
        })
    }

    /// One page of the dashboard after search and filters
    pub async fn report_page(
        &self,
        principal: Option<&Principal>,
        query: &AdminReportsQuery,
    ) -> Result<(AdminReportPageDto, Meta)> {
        require(principal, Capability::Admin)?;

        let reports = self.all_reports().await?;
        let categories = category_names(&reports);

        let filtered = DashboardFilter::from_query(query).apply(reports);
        let total = filtered.len() as i64;
        let page = query.page.max(1);

        let page_dto = AdminReportPageDto {
            reports: paginate(filtered, page, ADMIN_REPORTS_PAGE_SIZE),
            categories,
        };

        Ok((page_dto, Meta::paged(total, page, ADMIN_REPORTS_PAGE_SIZE)))
    }

    pub async fn update_status(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<ReportResponseDto> {
        let admin = require(principal, Capability::Admin)?;

        let record = self
            .reports
            .update_status(id, status)
            .await
            .map_err(AppError::persistence("Failed to update report status"))?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Report {} set to {} by {}", id, status, admin.id);

        record.try_into()
    }
}
