use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::features::access_gate::policy::{GateDecision, GatePolicy};
use crate::features::auth::SessionResolver;

/// State of the gate middleware
pub struct AccessGate {
    policy: GatePolicy,
    sessions: Arc<SessionResolver>,
}

impl AccessGate {
    pub fn new(policy: GatePolicy, sessions: Arc<SessionResolver>) -> Self {
        Self { policy, sessions }
    }

    fn redirect(&self, decision: GateDecision) -> Option<Response> {
        match decision {
            GateDecision::Proceed => None,
            GateDecision::RedirectHome => {
                Some(Redirect::temporary(&self.policy.home).into_response())
            }
            GateDecision::RedirectToSignIn { redirect_to } => {
                let location = format!(
                    "{}?redirectTo={}",
                    self.policy.sign_in,
                    urlencoding::encode(&redirect_to)
                );
                Some(Redirect::temporary(&location).into_response())
            }
        }
    }
}

pub async fn access_gate(
    State(gate): State<Arc<AccessGate>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if gate.policy.bypasses(&path) {
        return next.run(req).await;
    }

    let principal = gate.sessions.resolve(req.headers()).await;
    let decision = gate.policy.decide(&path, principal.as_ref());

    match gate.redirect(decision) {
        Some(response) => {
            tracing::debug!("Access gate redirected {}", path);
            response
        }
        None => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    use crate::shared::test_helpers::{
        session_config, session_token, InMemoryStore, ADMIN_ID, CITIZEN_ID,
    };

    fn server() -> TestServer {
        let store = InMemoryStore::seeded();
        let sessions = Arc::new(SessionResolver::new(&session_config(), store));
        let gate = Arc::new(AccessGate::new(GatePolicy::default(), sessions));

        let app = Router::new()
            .route("/", get(|| async { "home" }))
            .route("/sign-in", get(|| async { "sign in" }))
            .route("/report/new", get(|| async { "new report" }))
            .route("/admin/dashboard", get(|| async { "dashboard" }))
            .route("/api/reports", get(|| async { "api" }))
            .layer(axum::middleware::from_fn_with_state(gate, access_gate));

        TestServer::new(app).unwrap()
    }

    fn location(response: &axum_test::TestResponse) -> String {
        response.header("location").to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_anonymous_is_sent_to_sign_in() {
        let server = server();
        let response = server.get("/report/new").await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/sign-in?redirectTo=%2Freport%2Fnew");
    }

    #[tokio::test]
    async fn test_anonymous_on_admin_goes_home() {
        let server = server();
        let response = server.get("/admin/dashboard").await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_citizen_on_admin_goes_home() {
        let server = server();
        let response = server
            .get("/admin/dashboard")
            .add_header("cookie", format!("session_token={}", session_token(CITIZEN_ID)))
            .await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_admin_reaches_dashboard() {
        let server = server();
        let response = server
            .get("/admin/dashboard")
            .add_header("cookie", format!("session_token={}", session_token(ADMIN_ID)))
            .await;
        response.assert_status_ok();
        response.assert_text("dashboard");
    }

    #[tokio::test]
    async fn test_signed_in_user_leaves_sign_in() {
        let server = server();
        let response = server
            .get("/sign-in")
            .add_header("cookie", format!("session_token={}", session_token(CITIZEN_ID)))
            .await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_api_and_public_pages_pass() {
        let server = server();
        server.get("/api/reports").await.assert_text("api");
        server.get("/").await.assert_text("home");
        server.get("/sign-in").await.assert_text("sign in");
    }
}
