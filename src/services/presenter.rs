//! Display mapping for dashboard rows: status badges and date formatting.

use chrono::Locale;
use serde::Serialize;

use crate::models::request::{BorrowRequest, DonationRequest, RequestStatus};
use crate::models::timestamp::parse_timestamp;

/// Shown for absent timestamps.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown for timestamps that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Shown for missing names and titles.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Warning,
    Success,
    Info,
    Danger,
    Neutral,
}

impl BadgeTone {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Warning => "yellow",
            Self::Success => "green",
            Self::Info => "blue",
            Self::Danger => "red",
            Self::Neutral => "gray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: BadgeTone,
    pub color: &'static str,
}

/// Badge for a request status. Unrecognised statuses get a neutral badge
/// labelled with their original text.
pub fn status_badge(status: &RequestStatus) -> StatusBadge {
    let (label, tone) = match status {
        RequestStatus::Pending => ("Pending".to_string(), BadgeTone::Warning),
        RequestStatus::Approved => ("Approved".to_string(), BadgeTone::Success),
        RequestStatus::Completed => ("Completed".to_string(), BadgeTone::Info),
        RequestStatus::Returned => ("Returned".to_string(), BadgeTone::Info),
        RequestStatus::Rejected => ("Rejected".to_string(), BadgeTone::Danger),
        RequestStatus::Unknown(raw) if raw.trim().is_empty() => {
            (UNKNOWN.to_string(), BadgeTone::Neutral)
        }
        RequestStatus::Unknown(raw) => (raw.trim().to_string(), BadgeTone::Neutral),
    };
    StatusBadge {
        label,
        tone,
        color: tone.color(),
    }
}

fn badge_for(status: Option<&RequestStatus>) -> StatusBadge {
    match status {
        Some(status) => status_badge(status),
        None => status_badge(&RequestStatus::Unknown(String::new())),
    }
}

/// Localized date for display. Never fails.
pub fn format_timestamp(raw: Option<&str>, locale: Locale) -> String {
    match raw {
        None => NOT_AVAILABLE.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(parsed) => parsed.format_localized("%x", locale).to_string(),
            None => INVALID_DATE.to_string(),
        },
    }
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Recent borrow as rendered in the activity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorrowRow {
    pub id: Option<String>,
    pub member_name: String,
    pub book_title: String,
    pub status: StatusBadge,
    pub due_date: String,
    pub created_at: String,
}

/// Recent donation as rendered in the activity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRow {
    pub id: Option<String>,
    pub member_name: String,
    pub donation_title: String,
    pub status: StatusBadge,
    pub created_at: String,
}

pub fn borrow_rows(borrows: &[BorrowRequest], locale: Locale) -> Vec<BorrowRow> {
    borrows
        .iter()
        .map(|borrow| BorrowRow {
            id: borrow.id.as_ref().map(ToString::to_string),
            member_name: or_unknown(borrow.member_name.as_deref()),
            book_title: or_unknown(borrow.book_title.as_deref()),
            status: badge_for(borrow.status.as_ref()),
            due_date: format_timestamp(borrow.due_date.as_deref(), locale),
            created_at: format_timestamp(borrow.created_at.as_deref(), locale),
        })
        .collect()
}

pub fn donation_rows(donations: &[DonationRequest], locale: Locale) -> Vec<DonationRow> {
    donations
        .iter()
        .map(|donation| DonationRow {
            id: donation.id.as_ref().map(ToString::to_string),
            member_name: or_unknown(donation.member_name.as_deref()),
            donation_title: or_unknown(donation.donation_title.as_deref()),
            status: badge_for(donation.status.as_ref()),
            created_at: format_timestamp(donation.created_at.as_deref(), locale),
        })
        .collect()
}
