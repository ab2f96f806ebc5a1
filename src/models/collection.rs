//! Resource names and lenient decoding of collection payloads.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier as sent by the library API (numeric or string keys).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

/// The five collections the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Users,
    Books,
    Categories,
    BorrowRequests,
    DonationRequests,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Users,
        Resource::Books,
        Resource::Categories,
        Resource::BorrowRequests,
        Resource::DonationRequests,
    ];

    /// Endpoint path relative to the library API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Books => "books",
            Self::Categories => "categories",
            Self::BorrowRequests => "borrow-requests",
            Self::DonationRequests => "donation-requests",
        }
    }

    /// Request workflows change faster than reference data.
    pub fn is_request_workflow(&self) -> bool {
        matches!(self, Self::BorrowRequests | Self::DonationRequests)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decode a collection payload without ever failing.
///
/// Accepts a bare array or a paginated `{ "results": [...] }` envelope.
/// Anything else (including `null`) yields an empty collection. Elements
/// that are not JSON objects are skipped; badly typed fields inside an
/// object decode to their defaults and the row is kept.
pub fn decode_collection<T: DeserializeOwned>(resource: Resource, payload: Value) -> Vec<T> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!(%resource, "Payload is an object without a results array, treating as empty");
                return Vec::new();
            }
        },
        Value::Null => {
            tracing::warn!(%resource, "Payload is null, treating as empty");
            return Vec::new();
        }
        other => {
            tracing::warn!(%resource, kind = json_kind(&other), "Payload is not a collection, treating as empty");
            return Vec::new();
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                tracing::warn!(%resource, index, kind = json_kind(&item), "Skipping non-object element");
                return None;
            }
            match serde_json::from_value(item) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!(%resource, index, error = %e, "Skipping malformed element");
                    None
                }
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::debug!(%resource, total, kept = decoded.len(), "Collection decoded with skips");
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
