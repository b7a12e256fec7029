use std::sync::Arc;

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::core::config::SessionConfig;
use crate::core::error::AppError;
use crate::features::auth::model::Principal;
use crate::features::auth::repository::UserRepository;

/// Claims carried by the session token issued by the session service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,
}

/// Resolves the principal of a request from its session cookie or bearer token.
///
/// The token only proves who the caller is; name, avatar and role are always read
/// from the `users` table so a role change applies to live sessions.
pub struct SessionResolver {
    users: Arc<dyn UserRepository>,
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl SessionResolver {
    pub fn new(config: &SessionConfig, users: Arc<dyn UserRepository>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway.as_secs();
        validation.validate_nbf = true;

        Self {
            users,
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            cookie_name: config.cookie_name.clone(),
        }
    }

    /// Find the session token: the session cookie wins over an Authorization header
    pub fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
        let from_cookie = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());

        from_cookie.or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
        })
    }

    /// Check the token signature and expiry
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))
    }

    /// Resolve the principal for a request. Any failure resolves to an anonymous caller.
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = self.extract_token(headers)?;

        let claims = match self.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                return None;
            }
        };

        match self.users.find_by_id(&claims.sub).await {
            Ok(Some(user)) => Some(Principal::from(user)),
            Ok(None) => {
                tracing::warn!("Session refers to unknown user: {}", claims.sub);
                None
            }
            Err(e) => {
                tracing::error!("Failed to load session user {}: {:?}", claims.sub, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        session_config, session_token, InMemoryStore, ADMIN_ID, CITIZEN_ID,
    };
    use axum::http::HeaderValue;

    fn resolver(store: &Arc<InMemoryStore>) -> SessionResolver {
        SessionResolver::new(&session_config(), store.clone())
    }

    fn cookie_headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let store = InMemoryStore::seeded();
        let resolver = resolver(&store);

        let headers = cookie_headers("theme=dark; session_token=abc.def.ghi; lang=fr");
        assert_eq!(resolver.extract_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let store = InMemoryStore::seeded();
        let resolver = resolver(&store);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-123"),
        );
        assert_eq!(resolver.extract_token(&headers), Some("token-123".to_string()));

        assert_eq!(resolver.extract_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_resolve_loads_role_from_users() {
        let store = InMemoryStore::seeded();
        let resolver = resolver(&store);

        let headers = cookie_headers(&format!("session_token={}", session_token(ADMIN_ID)));
        let principal = resolver.resolve(&headers).await.expect("principal");
        assert_eq!(principal.id, ADMIN_ID);
        assert!(principal.is_admin());

        let headers = cookie_headers(&format!("session_token={}", session_token(CITIZEN_ID)));
        let principal = resolver.resolve(&headers).await.expect("principal");
        assert!(!principal.is_admin());
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_tokens() {
        let store = InMemoryStore::seeded();
        let resolver = resolver(&store);

        let headers = cookie_headers("session_token=not-a-jwt");
        assert!(resolver.resolve(&headers).await.is_none());

        let headers = cookie_headers(&format!(
            "session_token={}",
            session_token("someone-who-does-not-exist")
        ));
        assert!(resolver.resolve(&headers).await.is_none());
    }
}
