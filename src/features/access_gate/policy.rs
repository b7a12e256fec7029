use crate::features::auth::access::{authorize, Capability};
use crate::features::auth::model::Principal;
use crate::shared::validation::STATIC_ASSET_REGEX;

/// Outcome of the gate for one request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectHome,
    /// Redirect to the sign-in page, coming back to `redirect_to` afterwards
    RedirectToSignIn { redirect_to: String },
}

/// Which paths are public, which are auth pages and which are admin-only
#[derive(Debug, Clone)]
pub struct GatePolicy {
    pub public_routes: Vec<String>,
    pub auth_routes: Vec<String>,
    pub admin_prefix: String,
    /// Prefixes that never go through the gate (API, framework assets, docs)
    pub bypass_prefixes: Vec<String>,
    pub home: String,
    pub sign_in: String,
}

impl Default for GatePolicy {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            public_routes: owned(&["/", "/about", "/contact"]),
            auth_routes: owned(&["/sign-in", "/sign-up"]),
            admin_prefix: "/admin".to_string(),
            bypass_prefixes: owned(&[
                "/api",
                "/_next",
                "/_static",
                "/swagger-ui",
                "/api-docs",
                "/health",
            ]),
            home: "/".to_string(),
            sign_in: "/sign-in".to_string(),
        }
    }
}

/// `path` is `prefix` itself or a path below it
fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl GatePolicy {
    /// Requests that skip session resolution entirely
    pub fn bypasses(&self, path: &str) -> bool {
        STATIC_ASSET_REGEX.is_match(path)
            || self.bypass_prefixes.iter().any(|prefix| under(path, prefix))
    }

    pub fn is_admin_path(&self, path: &str) -> bool {
        under(path, &self.admin_prefix)
    }

    pub fn is_auth_page(&self, path: &str) -> bool {
        self.auth_routes.iter().any(|route| under(path, route))
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.iter().any(|route| route == path) || self.is_auth_page(path)
    }

    /// Decide a non-bypassed request.
    ///
    /// The admin check runs first, so anonymous callers on admin pages go home
    /// rather than to the sign-in page.
    pub fn decide(&self, path: &str, principal: Option<&Principal>) -> GateDecision {
        if self.is_admin_path(path) {
            return if authorize(principal, Capability::Admin).is_authorized() {
                GateDecision::Proceed
            } else {
                GateDecision::RedirectHome
            };
        }

        match principal {
            None if !self.is_public(path) => GateDecision::RedirectToSignIn {
                redirect_to: path.to_string(),
            },
            Some(_) if self.is_auth_page(path) => GateDecision::RedirectHome,
            _ => GateDecision::Proceed,
        }
    }
}
