//! Library user as returned by the users endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{lenient, EntityId};

/// Library role. Roles the dashboard does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Member,
    Librarian,
    Admin,
    Unknown(String),
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "member" => Self::Member,
            "librarian" => Self::Librarian,
            "admin" => Self::Admin,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Librarian => write!(f, "librarian"),
            Self::Admin => write!(f, "admin"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::label")]
    pub role: Option<UserRole>,
}
