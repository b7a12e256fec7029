use crate::core::error::Result;
use crate::core::extractor::MaybePrincipal;
use crate::features::auth::access::{require, Capability};
use crate::features::auth::model::Principal;
use crate::shared::types::ApiResponse;
use axum::Json;

/// Current principal, as resolved from the session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<Principal>),
        (status = 401, description = "No active session")
    ),
    tag = "auth",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(principal: MaybePrincipal) -> Result<Json<ApiResponse<Principal>>> {
    let user = require(principal.as_ref(), Capability::Authenticated)?;
    Ok(Json(ApiResponse::success(Some(user.clone()), None, None)))
}
