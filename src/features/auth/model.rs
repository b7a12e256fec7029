use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::shared::constants::ROLE_ADMIN;

/// Roles known to this service. Users without a role are regular citizens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
}

impl Role {
    /// Parse the nullable `users.role` column. Unknown values carry no privileges.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            Some(ROLE_ADMIN) => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Row of the `users` table (owned by the session service)
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: Option<String>,
}

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: Option<Role>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

impl From<UserRecord> for Principal {
    fn from(u: UserRecord) -> Self {
        Self {
            role: Role::parse(u.role.as_deref()),
            id: u.id,
            name: u.name,
            email: u.email,
            image: u.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse(Some("ADMIN")), Some(Role::Admin));
        assert_eq!(Role::parse(Some("admin")), None);
        assert_eq!(Role::parse(Some("")), None);
        assert_eq!(Role::parse(None), None);
    }

    #[test]
    fn test_principal_from_user_record() {
        let principal = Principal::from(UserRecord {
            id: "u1".to_string(),
            name: "Awa".to_string(),
            email: "awa@example.com".to_string(),
            image: None,
            role: Some("ADMIN".to_string()),
        });
        assert!(principal.is_admin());
        assert_eq!(principal.name, "Awa");
    }
}
