use crate::features::auth::handler;
use axum::{routing::get, Router};

/// Session routes. The principal comes from the session middleware.
pub fn routes() -> Router {
    Router::new().route("/api/auth/me", get(handler::get_me))
}
