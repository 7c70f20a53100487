//! Slot reservation service.
//!
//! Lists open meeting slots page by page and books a slot at most once.
//! The at-most-once guarantee is delegated to `SlotRepository::book`, which
//! must perform the check and the update as a single atomic step; this
//! service adds input validation, a transaction deadline and error mapping.

use std::time::Duration;

use switchyard_types::error::{RepositoryError, SlotError};
use switchyard_types::slot::{
    BookingConfirmation, DEFAULT_MAX_PAGE_SIZE, Pagination, SlotId, SlotPage, validate_email,
};

use crate::repository::slot::{BookOutcome, SlotRepository};

/// Default deadline for one booking transaction.
pub const DEFAULT_BOOKING_TIMEOUT: Duration = Duration::from_secs(5);

/// Service for listing and booking time slots.
///
/// Generic over the repository trait so the core never depends on a
/// concrete storage engine.
pub struct SlotService<R: SlotRepository> {
    repo: R,
    max_page_size: u32,
    booking_timeout: Duration,
}

impl<R: SlotRepository> SlotService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            booking_timeout: DEFAULT_BOOKING_TIMEOUT,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_booking_timeout(mut self, booking_timeout: Duration) -> Self {
        self.booking_timeout = booking_timeout;
        self
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// List open slots for a 1-based page.
    pub async fn list_available(&self, page: u32, page_size: u32) -> Result<SlotPage, SlotError> {
        if page == 0 {
            return Err(SlotError::InvalidPagination("page must be at least 1".to_string()));
        }
        if page_size == 0 {
            return Err(SlotError::InvalidPagination(
                "page_size must be at least 1".to_string(),
            ));
        }
        if page_size > self.max_page_size {
            return Err(SlotError::PageSizeExceeded {
                max_page_size: self.max_page_size,
            });
        }

        let offset = Pagination::offset(page, page_size);
        let (slots, total_count) = self
            .repo
            .list_available(offset, page_size)
            .await
            .map_err(storage_error)?;

        tracing::debug!(page, page_size, total_count, returned = slots.len(), "listed open slots");

        Ok(SlotPage {
            slots,
            pagination: Pagination::new(page, page_size, total_count),
        })
    }

    /// Book `slot_id` for `email`.
    ///
    /// Exactly one of several concurrent callers for the same open slot
    /// succeeds; the rest get `SlotError::AlreadyBooked`. A timed-out or
    /// failed transaction is reported as `SlotError::Storage` and is never
    /// retried here. A timed-out booking may still have committed, so callers
    /// should re-list before retrying.
    pub async fn book(
        &self,
        slot_id: SlotId,
        email: &str,
    ) -> Result<BookingConfirmation, SlotError> {
        validate_email(email).map_err(SlotError::InvalidEmail)?;

        let outcome = tokio::time::timeout(self.booking_timeout, self.repo.book(slot_id, email))
            .await
            .map_err(|_| {
                storage_error(RepositoryError::Timeout(self.booking_timeout.as_millis() as u64))
            })?
            .map_err(storage_error)?;

        match outcome {
            BookOutcome::Booked(slot) => {
                tracing::info!(slot_id = %slot.id, "slot booked");
                Ok(BookingConfirmation::for_slot(
                    slot.id,
                    email,
                    slot.start_time,
                    slot.end_time,
                ))
            }
            BookOutcome::AlreadyBooked => {
                tracing::warn!(%slot_id, "booking rejected: slot already booked");
                Err(SlotError::AlreadyBooked)
            }
            BookOutcome::NotFound => {
                tracing::warn!(%slot_id, "booking rejected: slot not found");
                Err(SlotError::NotFound)
            }
        }
    }
}

fn storage_error(e: RepositoryError) -> SlotError {
    tracing::error!(error = %e, "slot storage failure");
    SlotError::Storage(e.to_string())
}
