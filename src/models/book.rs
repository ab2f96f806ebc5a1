//! Catalogue entities: books and categories.

use serde::{Deserialize, Serialize};

use super::{lenient, EntityId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_copies: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub times_borrowed: Option<i64>,
}

impl Book {
    /// Copies on the shelf; missing or negative values count as zero.
    pub fn copies(&self) -> u64 {
        self.total_copies.unwrap_or(0).max(0) as u64
    }

    /// Borrow count; missing or negative values count as zero.
    pub fn borrow_count(&self) -> u64 {
        self.times_borrowed.unwrap_or(0).max(0) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
}
