use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Largest page a caller may request when listing open slots.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 16;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Longest email accepted for a booking (matches the storage column).
pub const MAX_EMAIL_LEN: usize = 255;

/// Storage-assigned identifier for a time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SlotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A bookable meeting interval.
///
/// Slots are created by seeding and only ever transition from open to
/// booked; they are never deleted or released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub booked_by_email: Option<String>,
}

/// Returned to the caller who won a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub message: String,
    pub slot_id: SlotId,
    pub email: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl BookingConfirmation {
    pub fn for_slot(
        slot_id: SlotId,
        email: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            message: format!("Slot {slot_id} booked successfully for {email}"),
            slot_id,
            email: email.to_string(),
            start_time,
            end_time,
        }
    }
}

/// Pagination metadata for a slot listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Derive page counts and navigation flags. `page_size` must be non-zero.
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(page_size));
        Self {
            page,
            page_size,
            total_count,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }

    /// Number of rows to skip to reach the 1-based `page`.
    pub fn offset(page: u32, page_size: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(page_size)
    }
}

/// One page of open slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPage {
    pub slots: Vec<TimeSlot>,
    pub pagination: Pagination,
}

/// Basic shape check for a booking email.
///
/// Requires a non-empty local part, a single `@`, and a dotted domain.
/// Anything stricter belongs to whoever sends the confirmation mail.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email cannot be empty".to_string());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("email must be at most {MAX_EMAIL_LEN} characters"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err("email cannot contain whitespace".to_string());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("email must contain '@'".to_string());
    };
    if local.is_empty() || domain.contains('@') {
        return Err("email must have exactly one '@' with a local part".to_string());
    }
    let has_dotted_domain = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !has_dotted_domain {
        return Err(format!("invalid email domain: '{domain}'"));
    }

    Ok(())
}
