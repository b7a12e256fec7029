//! In-memory search, filtering and pagination for the admin dashboard.

use crate::features::admin::dtos::AdminReportsQuery;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::models::ReportStatus;

#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    search: Option<String>,
    status: Option<ReportStatus>,
    category: Option<String>,
}

impl DashboardFilter {
    pub fn from_query(query: &AdminReportsQuery) -> Self {
        Self {
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            status: query.status,
            category: query
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
                .map(str::to_string),
        }
    }

    pub fn matches(&self, report: &ReportResponseDto) -> bool {
        if let Some(needle) = &self.search {
            let hit = report.title.to_lowercase().contains(needle)
                || report.description.to_lowercase().contains(needle)
                || report.id.to_string().contains(needle);
            if !hit {
                return false;
            }
        }

        if self.status.is_some_and(|s| s != report.status) {
            return false;
        }

        match &self.category {
            Some(category) => &report.category_name == category,
            None => true,
        }
    }

    pub fn apply(&self, reports: Vec<ReportResponseDto>) -> Vec<ReportResponseDto> {
        reports.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Items of a 1-based page. Pages below 1 read as 1; pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Vec<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size);

    items
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(page_size as usize)
        .collect()
}

/// Sorted distinct category names
pub fn category_names(reports: &[ReportResponseDto]) -> Vec<String> {
    let mut names: Vec<String> = reports.iter().map(|r| r.category_name.clone()).collect();
    names.sort();
    names.dedup();
    names
}
