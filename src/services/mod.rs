//! Business logic services.

pub mod aggregator;
pub mod auth;
pub mod dashboard;
pub mod fetcher;
pub mod library_api;
pub mod presenter;
pub mod query_cache;
