//! Capability checks shared by every privileged operation.
//!
//! Services receive the resolved principal as an argument and ask
//! [`authorize`] whether it may perform the operation. The answer is a tagged
//! [`Authorization`] value; converting it into an `AppError` is left to the caller.

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Principal;

/// What an operation requires from its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any resolved session
    Authenticated,
    /// A session whose role is ADMIN
    Admin,
}

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Authorization<'a> {
    Authorized(&'a Principal),
    /// No session where one is required
    Unauthenticated,
    /// Session present (or not) but the role is insufficient
    Forbidden,
}

pub fn authorize(principal: Option<&Principal>, capability: Capability) -> Authorization<'_> {
    match (principal, capability) {
        (Some(p), Capability::Authenticated) => Authorization::Authorized(p),
        (None, Capability::Authenticated) => Authorization::Unauthenticated,
        (Some(p), Capability::Admin) if p.is_admin() => Authorization::Authorized(p),
        // Admin operations answer Forbidden for anonymous callers too
        (_, Capability::Admin) => Authorization::Forbidden,
    }
}

impl<'a> Authorization<'a> {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Authorization::Authorized(_))
    }

    pub fn into_result(self) -> Result<&'a Principal> {
        match self {
            Authorization::Authorized(p) => Ok(p),
            Authorization::Unauthenticated => {
                Err(AppError::Unauthorized("User not authenticated".to_string()))
            }
            Authorization::Forbidden => Err(AppError::Forbidden("User not authorized".to_string())),
        }
    }
}

/// Shorthand for `authorize(..).into_result()`
pub fn require(principal: Option<&Principal>, capability: Capability) -> Result<&Principal> {
    authorize(principal, capability).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{admin_principal, citizen_principal};

    #[test]
    fn test_authenticated_capability() {
        let citizen = citizen_principal();
        assert!(authorize(Some(&citizen), Capability::Authenticated).is_authorized());
        assert_eq!(
            authorize(None, Capability::Authenticated),
            Authorization::Unauthenticated
        );
    }

    #[test]
    fn test_admin_capability() {
        let admin = admin_principal();
        let citizen = citizen_principal();

        assert_eq!(
            authorize(Some(&admin), Capability::Admin),
            Authorization::Authorized(&admin)
        );
        assert_eq!(
            authorize(Some(&citizen), Capability::Admin),
            Authorization::Forbidden
        );
        assert_eq!(authorize(None, Capability::Admin), Authorization::Forbidden);
    }

    #[test]
    fn test_into_result_maps_to_app_errors() {
        assert!(matches!(
            require(None, Capability::Authenticated),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            require(None, Capability::Admin),
            Err(AppError::Forbidden(_))
        ));
    }
}
