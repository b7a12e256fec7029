use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, MaybePrincipal};
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all report categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 500, description = "Failed to fetch report categories")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Create a report category
///
/// Admin only. A blank description is stored as absent.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "User not authorized"),
        (status = 500, description = "Failed to add report category")
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    principal: MaybePrincipal,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create(principal.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::categories::{routes, CategoryService};
    use crate::shared::test_helpers::{admin_principal, citizen_principal, with_principal, InMemoryStore};
    use std::sync::Arc;

    fn server(principal: Option<crate::features::auth::model::Principal>) -> TestServer {
        let store = InMemoryStore::seeded();
        let service = Arc::new(CategoryService::new(store));
        let app = with_principal(routes::routes(service), principal);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_list_categories_is_public() {
        let server = server(None);
        let response = server.get("/api/categories").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert!(body["data"].as_array().map(|a| !a.is_empty()).unwrap_or(false));
    }

    #[tokio::test]
    async fn test_create_category_as_admin() {
        let server = server(Some(admin_principal()));
        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Graffiti", "description": "" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "Graffiti");
        assert!(body["data"]["description"].is_null());
    }

    #[tokio::test]
    async fn test_create_category_as_citizen_is_forbidden() {
        let server = server(Some(citizen_principal()));
        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Graffiti" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }
}
