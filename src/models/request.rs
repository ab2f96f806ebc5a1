//! Borrow and donation requests submitted by members.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{lenient, EntityId};

/// Workflow status shared by borrow and donation requests.
///
/// Statuses added server-side later land in `Unknown` with their original
/// text instead of being silently folded into a known bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    Pending,
    Approved,
    Completed,
    Returned,
    Rejected,
    Unknown(String),
}

impl From<String> for RequestStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "completed" => Self::Completed,
            "returned" => Self::Returned,
            "rejected" => Self::Rejected,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Completed => write!(f, "completed"),
            Self::Returned => write!(f, "returned"),
            Self::Rejected => write!(f, "rejected"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowRequest {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub member_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub book_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::label")]
    pub status: Option<RequestStatus>,
    /// Set once the request is approved.
    #[serde(default, deserialize_with = "lenient::text")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRequest {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub member_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donation_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::label")]
    pub status: Option<RequestStatus>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
}
