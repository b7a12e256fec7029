use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, mapping as reports_mapping,
    models as reports_models,
};
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::modules::storage::StoredObject;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        // Reports
        reports_handlers::submit_report,
        reports_handlers::submit_report_with_photos,
        reports_handlers::list_reports,
        reports_handlers::list_my_reports,
        reports_handlers::get_report,
        reports_handlers::add_comment,
        // Uploads
        uploads_handlers::upload_photos,
        uploads_handlers::delete_photos,
        // Admin
        admin_handlers::report_stats,
        admin_handlers::list_reports,
        admin_handlers::update_report_status,
    ),
    components(
        schemas(
            // Shared
            Meta,
            StoredObject,
            // Auth
            auth::model::Principal,
            auth::model::Role,
            ApiResponse<auth::model::Principal>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_mapping::GeoPoint,
            reports_dtos::GeoLocationInput,
            reports_dtos::SubmitReportDto,
            reports_dtos::SubmitReportWithPhotosForm,
            reports_dtos::ReportResponseDto,
            reports_dtos::SubmitReportResponseDto,
            reports_dtos::ReportDetailResponseDto,
            reports_dtos::CommentResponseDto,
            reports_dtos::CreateCommentDto,
            reports_dtos::ReportSort,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::SubmitReportResponseDto>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            ApiResponse<reports_dtos::CommentResponseDto>,
            // Uploads
            uploads_dtos::UploadPhotosForm,
            uploads_dtos::UploadPhotosResponseDto,
            uploads_dtos::DeletePhotosDto,
            uploads_dtos::DeletePhotosResponseDto,
            ApiResponse<uploads_dtos::UploadPhotosResponseDto>,
            ApiResponse<uploads_dtos::DeletePhotosResponseDto>,
            // Admin
            admin_dtos::StatusCounts,
            admin_dtos::ReportStatsDto,
            admin_dtos::AdminReportPageDto,
            ApiResponse<admin_dtos::ReportStatsDto>,
            ApiResponse<admin_dtos::AdminReportPageDto>,
        )
    ),
    tags(
        (name = "auth", description = "Session of the current user"),
        (name = "categories", description = "Report categories"),
        (name = "reports", description = "Citizen reports and their comments"),
        (name = "uploads", description = "Report photo upload and removal"),
        (name = "admin", description = "Admin dashboard (ADMIN role only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Civic Signal API",
        version = "0.1.0",
        description = "API documentation for Civic Signal",
    )
)]
pub struct ApiDoc;

/// Adds the session cookie and bearer token security schemes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_token"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
