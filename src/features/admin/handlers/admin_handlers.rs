use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, MaybePrincipal};
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::reports::dtos::{ReportResponseDto, UpdateReportStatusDto};
use crate::shared::types::ApiResponse;

/// Report statistics
///
/// Every report plus counts per status. Statuses with no report are omitted.
#[utoipa::path(
    get,
    path = "/api/admin/reports/stats",
    responses(
        (status = 200, description = "Report statistics", body = ApiResponse<ReportStatsDto>),
        (status = 403, description = "User not authorized"),
        (status = 500, description = "Failed to fetch report statistics")
    ),
    tag = "admin",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn report_stats(
    State(service): State<Arc<AdminService>>,
    principal: MaybePrincipal,
) -> Result<Json<ApiResponse<ReportStatsDto>>> {
    let stats = service.report_stats(principal.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Dashboard page of reports (6 per page)
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    params(AdminReportsQuery),
    responses(
        (status = 200, description = "Filtered page of reports", body = ApiResponse<AdminReportPageDto>),
        (status = 403, description = "User not authorized")
    ),
    tag = "admin",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn list_reports(
    State(service): State<Arc<AdminService>>,
    principal: MaybePrincipal,
    Query(query): Query<AdminReportsQuery>,
) -> Result<Json<ApiResponse<AdminReportPageDto>>> {
    let (page, meta) = service.report_page(principal.as_ref(), &query).await?;
    Ok(Json(ApiResponse::success(Some(page), None, Some(meta))))
}

/// Change the status of a report
#[utoipa::path(
    patch,
    path = "/api/admin/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "User not authorized"),
        (status = 404, description = "Report not found")
    ),
    tag = "admin",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn update_report_status(
    State(service): State<Arc<AdminService>>,
    principal: MaybePrincipal,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service
        .update_status(principal.as_ref(), id, dto.status)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Report status updated".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::features::admin::{routes, AdminService};
    use crate::features::auth::model::Principal;
    use crate::features::reports::models::ReportStatus;
    use crate::shared::test_helpers::{
        admin_principal, citizen_principal, with_principal, InMemoryStore, ROAD_CATEGORY_ID,
    };

    fn server(principal: Option<Principal>) -> (TestServer, Arc<InMemoryStore>) {
        let store = InMemoryStore::seeded();
        let service = Arc::new(AdminService::new(store.clone()));
        let app = Router::new().nest("/api/admin", routes::routes(service));
        (
            TestServer::new(with_principal(app, principal)).unwrap(),
            store,
        )
    }

    #[tokio::test]
    async fn test_stats_forbidden_for_citizen() {
        let (server, _) = server(Some(citizen_principal()));
        server
            .get("/api/admin/reports/stats")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_stats_omit_absent_statuses() {
        let (server, store) = server(Some(admin_principal()));
        store.insert_report(&citizen_principal().id, ROAD_CATEGORY_ID);

        let response = server.get("/api/admin/reports/stats").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["total_reports"], 1);
        assert_eq!(body["data"]["reports_by_status"], json!({ "SUBMITTED": 1 }));
    }

    #[tokio::test]
    async fn test_dashboard_page_meta() {
        let (server, store) = server(Some(admin_principal()));
        for _ in 0..7 {
            store.insert_report(&citizen_principal().id, ROAD_CATEGORY_ID);
        }

        let response = server
            .get("/api/admin/reports")
            .add_query_param("page", 2)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["reports"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["meta"]["total"], 7);
        assert_eq!(body["meta"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_update_status() {
        let (server, store) = server(Some(admin_principal()));
        let id = store.insert_report(&citizen_principal().id, ROAD_CATEGORY_ID);

        let response = server
            .patch(&format!("/api/admin/reports/{}/status", id))
            .json(&json!({ "status": "RESOLVED" }))
            .await;
        response.assert_status_ok();
        assert_eq!(store.status_of(id), Some(ReportStatus::Resolved));
    }
}
