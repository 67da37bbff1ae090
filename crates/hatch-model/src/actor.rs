use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Role asserted by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Founder,
    Admin,
}

impl Role {
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Founder => "FOUNDER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FOUNDER" => Ok(Role::Founder),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(crate::ModelError::unknown("role", s)),
        }
    }
}

/// An authenticated human, already verified upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    #[inline]
    #[must_use]
    pub fn founder(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Founder,
        }
    }

    #[inline]
    #[must_use]
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
