//! Entities read from the library API and the helpers that decode them.

pub mod book;
pub mod collection;
pub mod lenient;
pub mod request;
pub mod timestamp;
pub mod user;

pub use collection::{EntityId, Resource};
