use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{CommentService, ReportService};
use crate::features::uploads::routes::PHOTO_BATCH_BODY_LIMIT;

/// Create routes for the reports feature
///
/// Reads are public; writes check the session in the services.
pub fn routes(
    report_service: Arc<ReportService>,
    comment_service: Arc<CommentService>,
) -> Router {
    let state = ReportState {
        report_service,
        comment_service,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::submit_report),
        )
        .route(
            "/api/reports/with-photos",
            post(handlers::submit_report_with_photos)
                .layer(DefaultBodyLimit::max(PHOTO_BATCH_BODY_LIMIT)),
        )
        .route("/api/reports/mine", get(handlers::list_my_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route("/api/reports/{id}/comments", post(handlers::add_comment))
        .with_state(state)
}
