use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address of the root administrator; this account can never be deleted.
pub const ROOT_ADMIN_EMAIL: &str = "admin@marketpulse.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::User => f.write_str("user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{other}' (expected admin or user)")),
        }
    }
}

/// An account as seen by the rest of the application.
///
/// Credentials are never part of this type; the local auth store keeps its
/// password digests in a separate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn is_root_admin(&self) -> bool {
        self.email.eq_ignore_ascii_case(ROOT_ADMIN_EMAIL)
    }
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn root_admin_detection_ignores_case() {
        let user = User {
            id: "1".into(),
            name: "Administrador".into(),
            email: "Admin@MarketPulse.com".into(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        assert!(user.is_root_admin());
        assert!(user.is_admin());
    }
}
