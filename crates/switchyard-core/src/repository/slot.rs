//! Time slot repository trait definition.

use switchyard_types::error::RepositoryError;
use switchyard_types::slot::{SlotId, TimeSlot};

/// Outcome of a conditional booking attempt.
///
/// `AlreadyBooked` and `NotFound` are ordinary outcomes, not storage
/// failures: the repository reports them without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOutcome {
    /// The slot flipped from open to booked; carries the updated row.
    Booked(TimeSlot),
    AlreadyBooked,
    NotFound,
}

/// Repository trait for time slot persistence.
///
/// Implementations live in switchyard-infra (e.g., SqliteSlotRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SlotRepository: Send + Sync {
    /// Fetch one page of open slots ordered by id ascending, together with
    /// the total number of open slots.
    fn list_available(
        &self,
        offset: u64,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<(Vec<TimeSlot>, u64), RepositoryError>> + Send;

    /// Atomically mark the slot booked by `email` if, and only if, it is
    /// still open. Concurrent calls for the same slot must serialize so that
    /// exactly one observes `Booked`.
    fn book(
        &self,
        id: SlotId,
        email: &str,
    ) -> impl std::future::Future<Output = Result<BookOutcome, RepositoryError>> + Send;
}
