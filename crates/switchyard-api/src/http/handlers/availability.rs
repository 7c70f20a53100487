//! Time slot listing and booking handlers.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use switchyard_types::slot::{BookingConfirmation, SlotPage};

use crate::http::error::AppError;
use crate::http::extractors::query::{AvailabilityQuery, BookQuery, ValidatedQuery};
use crate::state::AppState;

/// GET /availability/ - Page through open slots in id order.
pub async fn list_slots(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AvailabilityQuery>,
) -> Result<Json<SlotPage>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let (page, page_size) = query.validate()?;

    let slots = state.slot_service.list_available(page, page_size).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    tracing::debug!(
        %request_id,
        page,
        page_size,
        returned = slots.slots.len(),
        total = slots.pagination.total_count,
        elapsed_ms = elapsed,
        "listed open slots"
    );

    Ok(Json(slots))
}

/// POST /availability/book - Reserve one slot for an email address.
pub async fn book_slot(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BookQuery>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let confirmation = state.slot_service.book(query.slot_id, &query.email).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    tracing::info!(
        %request_id,
        slot_id = %confirmation.slot_id,
        elapsed_ms = elapsed,
        "slot booked"
    );

    Ok(Json(confirmation))
}
