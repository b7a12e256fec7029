use crate::features::auth::SessionResolver;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        // Parse origins into HeaderValue
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            let mut response = Response::new(Body::from("Unauthorized"));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Swagger UI\""),
            );

            Err(response)
        })
    }
}

/// Attach the caller's `Principal` to the request when the session resolves.
///
/// Requests without a valid session continue anonymously; services decide
/// whether the operation needs one.
pub async fn session_middleware(
    State(sessions): State<Arc<SessionResolver>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(principal) = sessions.resolve(req.headers()).await {
        req.extensions_mut().insert(principal);
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    use crate::core::extractor::MaybePrincipal;
    use crate::shared::test_helpers::{
        session_config, session_token, InMemoryStore, CITIZEN_ID,
    };

    async fn whoami(principal: MaybePrincipal) -> String {
        principal
            .as_ref()
            .map(|p| p.id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn server() -> TestServer {
        let sessions = Arc::new(SessionResolver::new(
            &session_config(),
            InMemoryStore::seeded(),
        ));
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn_with_state(sessions, session_middleware));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_session_cookie_sets_principal() {
        let response = server()
            .get("/whoami")
            .add_header("cookie", format!("session_token={}", session_token(CITIZEN_ID)))
            .await;
        response.assert_text(CITIZEN_ID);
    }

    #[tokio::test]
    async fn test_bearer_token_sets_principal() {
        let response = server()
            .get("/whoami")
            .add_header("authorization", format!("Bearer {}", session_token(CITIZEN_ID)))
            .await;
        response.assert_text(CITIZEN_ID);
    }

    #[tokio::test]
    async fn test_bad_token_is_anonymous() {
        let response = server()
            .get("/whoami")
            .add_header("cookie", "session_token=not-a-jwt")
            .await;
        response.assert_status_ok();
        response.assert_text("anonymous");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = MakeRequestUuid;
        let req = axum::http::Request::new(());
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
