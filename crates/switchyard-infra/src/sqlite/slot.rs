//! SQLite time slot repository implementation.
//!
//! Implements `SlotRepository` from `switchyard-core` using sqlx with split
//! read/write pools. Booking is a conditional update
//! (`... WHERE id = ? AND is_booked = 0`) inside one writer transaction, so
//! the check and the state change cannot be interleaved by another caller.

use chrono::{DateTime, Utc};
use sqlx::Row;
use switchyard_core::repository::slot::{BookOutcome, SlotRepository};
use switchyard_types::error::RepositoryError;
use switchyard_types::slot::{SlotId, TimeSlot};

use super::pool::DatabasePool;

const SLOT_COLUMNS: &str = "id, start_time, end_time, is_booked, booked_by_email";

/// SQLite-backed implementation of `SlotRepository`.
pub struct SqliteSlotRepository {
    pool: DatabasePool,
}

impl SqliteSlotRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain TimeSlot.
struct SlotRow {
    id: i64,
    start_time: String,
    end_time: String,
    is_booked: bool,
    booked_by_email: Option<String>,
}

impl SlotRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            is_booked: row.try_get("is_booked")?,
            booked_by_email: row.try_get("booked_by_email")?,
        })
    }

    fn into_slot(self) -> Result<TimeSlot, RepositoryError> {
        Ok(TimeSlot {
            id: SlotId(self.id),
            start_time: parse_datetime(&self.start_time)?,
            end_time: parse_datetime(&self.end_time)?,
            is_booked: self.is_booked,
            booked_by_email: self.booked_by_email,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn decode(row: &sqlx::sqlite::SqliteRow) -> Result<TimeSlot, RepositoryError> {
    SlotRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_slot()
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}

impl SlotRepository for SqliteSlotRepository {
    async fn list_available(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<TimeSlot>, u64), RepositoryError> {
        // One read transaction so the count and the page come from the same snapshot.
        let mut tx = self.pool.reader.begin().await.map_err(query_error)?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM time_slots WHERE is_booked = 0")
            .fetch_one(&mut *tx)
            .await
            .map_err(query_error)?;

        let offset = i64::try_from(offset)
            .map_err(|_| RepositoryError::Query(format!("offset {offset} out of range")))?;

        let rows = sqlx::query(&format!(
            "SELECT {SLOT_COLUMNS} FROM time_slots WHERE is_booked = 0 \
             ORDER BY id ASC LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        let mut slots = Vec::with_capacity(rows.len());
        for row in &rows {
            slots.push(decode(row)?);
        }

        Ok((slots, total.max(0) as u64))
    }

    async fn book(&self, id: SlotId, email: &str) -> Result<BookOutcome, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let updated = sqlx::query(&format!(
            "UPDATE time_slots SET is_booked = 1, booked_by_email = ?
             WHERE id = ? AND is_booked = 0
             RETURNING {SLOT_COLUMNS}"
        ))
        .bind(email)
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_error)?;

        if let Some(row) = updated {
            let slot = decode(&row)?;
            tx.commit().await.map_err(query_error)?;
            return Ok(BookOutcome::Booked(slot));
        }

        // Nothing changed: tell a missing slot apart from a taken one.
        let exists = sqlx::query("SELECT id FROM time_slots WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error)?
            .is_some();

        tx.rollback().await.map_err(query_error)?;

        Ok(if exists {
            BookOutcome::AlreadyBooked
        } else {
            BookOutcome::NotFound
        })
    }
}
