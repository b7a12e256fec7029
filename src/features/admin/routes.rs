use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes, nested under `/api/admin` (every handler requires ADMIN)
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/reports", get(handlers::list_reports))
        .route("/reports/stats", get(handlers::report_stats))
        .route("/reports/{id}/status", patch(handlers::update_report_status))
        .with_state(admin_service)
}
