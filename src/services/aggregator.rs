//! Dashboard statistics aggregation.
//!
//! Pure functions over the fetched collections. The current time is passed
//! in so results are reproducible.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::book::{Book, Category};
use crate::models::request::{BorrowRequest, DonationRequest, RequestStatus};
use crate::models::timestamp::parse_timestamp;
use crate::models::user::{User, UserRole};

/// Length of the popular-books and recent-activity lists.
pub const TOP_N: usize = 5;

/// Aggregated statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub users: UserStats,
    pub books: BookStats,
    pub borrows: BorrowStats,
    pub donations: DonationStats,
}

/// User counts by role. `active` counts members.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub librarians: u64,
    pub admins: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookStats {
    pub total: u64,
    pub total_copies: u64,
    pub categories: u64,
    pub popular: Vec<Book>,
}

/// Borrow counts by status. `overdue` is a subset of `approved`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorrowStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub returned: u64,
    pub overdue: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DonationStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub completed: u64,
    pub rejected: u64,
}

/// Most recently created requests, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentActivity {
    pub borrows: Vec<BorrowRequest>,
    pub donations: Vec<DonationRequest>,
}

pub fn compute_stats(
    users: &[User],
    books: &[Book],
    categories: &[Category],
    borrows: &[BorrowRequest],
    donations: &[DonationRequest],
    now: DateTime<Utc>,
) -> DashboardStats {
    DashboardStats {
        users: user_stats(users),
        books: book_stats(books, categories),
        borrows: borrow_stats(borrows, now),
        donations: donation_stats(donations),
    }
}

pub fn recent_activity(borrows: &[BorrowRequest], donations: &[DonationRequest]) -> RecentActivity {
    RecentActivity {
        borrows: most_recent(borrows, |b| b.created_at.as_deref()),
        donations: most_recent(donations, |d| d.created_at.as_deref()),
    }
}

fn user_stats(users: &[User]) -> UserStats {
    let mut stats = UserStats {
        total: users.len() as u64,
        ..Default::default()
    };
    for user in users {
        match user.role {
            Some(UserRole::Member) => stats.active += 1,
            Some(UserRole::Librarian) => stats.librarians += 1,
            Some(UserRole::Admin) => stats.admins += 1,
            Some(UserRole::Unknown(_)) | None => {}
        }
    }
    stats
}

fn book_stats(books: &[Book], categories: &[Category]) -> BookStats {
    let mut popular = books.to_vec();
    // sort_by is stable, so ties keep their source order.
    popular.sort_by(|a, b| b.borrow_count().cmp(&a.borrow_count()));
    popular.truncate(TOP_N);

    BookStats {
        total: books.len() as u64,
        total_copies: books.iter().map(Book::copies).sum(),
        categories: categories.len() as u64,
        popular,
    }
}

fn borrow_stats(borrows: &[BorrowRequest], now: DateTime<Utc>) -> BorrowStats {
    let mut stats = BorrowStats {
        total: borrows.len() as u64,
        ..Default::default()
    };
    for borrow in borrows {
        match borrow.status {
            Some(RequestStatus::Pending) => stats.pending += 1,
            Some(RequestStatus::Approved) => {
                stats.approved += 1;
                if is_overdue(borrow, now) {
                    stats.overdue += 1;
                }
            }
            Some(RequestStatus::Returned) => stats.returned += 1,
            // Rejected and unrecognised borrows count toward the total only.
            _ => {}
        }
    }
    stats
}

/// An unparseable or missing due date is never overdue.
fn is_overdue(borrow: &BorrowRequest, now: DateTime<Utc>) -> bool {
    borrow
        .due_date
        .as_deref()
        .and_then(parse_timestamp)
        .is_some_and(|due| due < now)
}

fn donation_stats(donations: &[DonationRequest]) -> DonationStats {
    let mut stats = DonationStats {
        total: donations.len() as u64,
        ..Default::default()
    };
    for donation in donations {
        match donation.status {
            Some(RequestStatus::Pending) => stats.pending += 1,
            Some(RequestStatus::Approved) => stats.approved += 1,
            Some(RequestStatus::Completed) => stats.completed += 1,
            Some(RequestStatus::Rejected) => stats.rejected += 1,
            _ => {}
        }
    }
    stats
}

/// First `TOP_N` items by creation time, newest first. Missing or
/// unparseable timestamps sort last; equal timestamps keep source order.
fn most_recent<T: Clone>(items: &[T], created_at: impl Fn(&T) -> Option<&str>) -> Vec<T> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &T)> = items
        .iter()
        .map(|item| (created_at(item).and_then(parse_timestamp), item))
        .collect();
    // None orders below Some, so descending order puts it last.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed
        .into_iter()
        .take(TOP_N)
        .map(|(_, item)| item.clone())
        .collect()
}
