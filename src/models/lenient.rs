//! Field decoders that never reject a row.
//!
//! Used through `#[serde(default, deserialize_with = "...")]`. A field with
//! the wrong JSON type decodes to `None` (or `Unknown` for labels) and the
//! rest of the row is kept.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::EntityId;

/// Integer count. Accepts integers, floats (truncated) and numeric strings.
pub fn count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    })
}

/// Free text. Anything but a string is dropped.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Identifier. Integers and strings are kept; other values are dropped.
pub fn id<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().map(EntityId::Int),
        Value::String(s) => Some(EntityId::Text(s)),
        _ => None,
    })
}

/// Closed label such as a role or status. Non-string values are kept as
/// their JSON text so they land in the label's `Unknown` variant.
pub fn label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(T::from(s)),
        other => Some(T::from(other.to_string())),
    })
}
