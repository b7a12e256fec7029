use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::models::ReportStatus;

// =============================================================================
// REPORT STATISTICS
// =============================================================================

/// Number of reports per status. Only statuses that occur are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct StatusCounts(BTreeMap<ReportStatus, i64>);

impl StatusCounts {
    pub fn increment(&mut self, status: ReportStatus) {
        *self.0.entry(status).or_insert(0) += 1;
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }
}

#[cfg(test)]
impl StatusCounts {
    /// Absent statuses read as 0
    pub fn count_for(&self, status: ReportStatus) -> i64 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    pub fn contains(&self, status: ReportStatus) -> bool {
        self.0.contains_key(&status)
    }
}

impl FromIterator<ReportStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = ReportStatus>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.increment(status);
        }
        counts
    }
}

/// Admin statistics over every report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportStatsDto {
    pub reports: Vec<ReportResponseDto>,
    pub total_reports: i64,
    pub reports_by_status: StatusCounts,
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// Query params of the admin report dashboard
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdminReportsQuery {
    /// Page number (1-indexed, values below 1 read as 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Case-insensitive match on title, description or id
    pub search: Option<String>,
    pub status: Option<ReportStatus>,
    /// Category name; `all` or empty means every category
    pub category: Option<String>,
}

fn default_page() -> i64 {
    1
}

/// One page of the admin report dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminReportPageDto {
    pub reports: Vec<ReportResponseDto>,
    /// Sorted distinct category names over all reports, for the filter selector
    pub categories: Vec<String>,
}
