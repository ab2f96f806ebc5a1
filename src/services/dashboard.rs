//! Admin dashboard view: fetch, aggregate, present.

use std::sync::Arc;

use chrono::{DateTime, Locale, Utc};
use serde::Serialize;

use crate::config::Staleness;
use crate::models::book::{Book, Category};
use crate::models::request::{BorrowRequest, DonationRequest};
use crate::models::user::User;
use crate::services::aggregator::{self, DashboardStats};
use crate::services::fetcher::{DashboardFetcher, Loaded, ResourceStatus};
use crate::services::library_api::ResourceSource;
use crate::services::presenter::{self, BorrowRow, DonationRow};

/// Everything the admin dashboard renders.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent_borrows: Vec<BorrowRow>,
    pub recent_donations: Vec<DonationRow>,
    /// True while any resource has never settled.
    pub is_loading: bool,
    pub resources: Vec<ResourceStatus>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct DashboardService {
    fetcher: DashboardFetcher,
    locale: Locale,
}

impl DashboardService {
    pub fn new(source: Arc<dyn ResourceSource>, staleness: Staleness, locale: Locale) -> Self {
        Self {
            fetcher: DashboardFetcher::new(source, staleness),
            locale,
        }
    }

    /// Fetch all five collections concurrently and build the view.
    pub async fn load(&self, now: DateTime<Utc>) -> DashboardView {
        let (users, books, categories, borrows, donations) = tokio::join!(
            self.fetcher.fetch_users(),
            self.fetcher.fetch_books(),
            self.fetcher.fetch_categories(),
            self.fetcher.fetch_borrow_requests(),
            self.fetcher.fetch_donation_requests(),
        );
        self.assemble(now, users, books, categories, borrows, donations)
    }

    /// Force every resource upstream, then build the view. Failed
    /// resources keep showing their previous data.
    pub async fn refresh(&self, now: DateTime<Utc>) -> DashboardView {
        self.fetcher.invalidate_all();
        self.load(now).await
    }

    /// Build the view from whatever is cached, without fetching.
    pub fn snapshot(&self, now: DateTime<Utc>) -> DashboardView {
        self.assemble(
            now,
            self.fetcher.peek(),
            self.fetcher.peek(),
            self.fetcher.peek(),
            self.fetcher.peek(),
            self.fetcher.peek(),
        )
    }

    /// Per-resource cache state, for readiness reporting.
    pub fn resource_statuses(&self) -> Vec<ResourceStatus> {
        vec![
            self.fetcher.peek::<User>().status,
            self.fetcher.peek::<Book>().status,
            self.fetcher.peek::<Category>().status,
            self.fetcher.peek::<BorrowRequest>().status,
            self.fetcher.peek::<DonationRequest>().status,
        ]
    }

    fn assemble(
        &self,
        now: DateTime<Utc>,
        users: Loaded<User>,
        books: Loaded<Book>,
        categories: Loaded<Category>,
        borrows: Loaded<BorrowRequest>,
        donations: Loaded<DonationRequest>,
    ) -> DashboardView {
        let is_loading = !(users.is_settled()
            && books.is_settled()
            && categories.is_settled()
            && borrows.is_settled()
            && donations.is_settled());

        let stats = aggregator::compute_stats(
            &users.items,
            &books.items,
            &categories.items,
            &borrows.items,
            &donations.items,
            now,
        );
        let recent = aggregator::recent_activity(&borrows.items, &donations.items);

        DashboardView {
            stats,
            recent_borrows: presenter::borrow_rows(&recent.borrows, self.locale),
            recent_donations: presenter::donation_rows(&recent.donations, self.locale),
            is_loading,
            resources: vec![
                users.status,
                books.status,
                categories.status,
                borrows.status,
                donations.status,
            ],
            generated_at: now,
        }
    }
}
