//! Seeding of bookable time slots.
//!
//! Lays out back-to-back slots between an opening and a closing hour of one
//! day. Slots whose start time already exists are skipped, so seeding the
//! same day twice is harmless.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use switchyard_types::error::RepositoryError;
use thiserror::Error;

use super::pool::DatabasePool;
use super::slot::format_datetime;

/// Errors from slot seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed plan: {0}")]
    InvalidPlan(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Which slots to create for one day (times are UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub date: NaiveDate,
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub slot_minutes: u32,
}

impl SeedPlan {
    /// Office hours 09:00-17:00 in 30-minute slots (16 slots).
    pub fn for_day(date: NaiveDate) -> Self {
        Self {
            date,
            opening_hour: 9,
            closing_hour: 17,
            slot_minutes: 30,
        }
    }

    /// Expand the plan into `(start, end)` pairs. A trailing remainder
    /// shorter than `slot_minutes` is dropped.
    pub fn intervals(&self) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, SeedError> {
        if self.slot_minutes == 0 {
            return Err(SeedError::InvalidPlan("slot length must be positive".to_string()));
        }
        if self.opening_hour >= self.closing_hour || self.closing_hour > 24 {
            return Err(SeedError::InvalidPlan(format!(
                "opening hour {} must be before closing hour {} (max 24)",
                self.opening_hour, self.closing_hour
            )));
        }

        let opening = NaiveTime::from_hms_opt(self.opening_hour, 0, 0)
            .ok_or_else(|| SeedError::InvalidPlan(format!("bad hour {}", self.opening_hour)))?;
        let day_start = self.date.and_time(opening).and_utc();
        let day_end = day_start + Duration::hours(i64::from(self.closing_hour - self.opening_hour));
        let step = Duration::minutes(i64::from(self.slot_minutes));

        let mut intervals = Vec::new();
        let mut start = day_start;
        while start + step <= day_end {
            intervals.push((start, start + step));
            start += step;
        }
        Ok(intervals)
    }
}

/// Insert the plan's slots as open slots. Returns how many rows were new.
pub async fn seed_slots(pool: &DatabasePool, plan: &SeedPlan) -> Result<u64, SeedError> {
    let intervals = plan.intervals()?;
    let query_error = |e: sqlx::Error| RepositoryError::Query(e.to_string());

    let mut tx = pool.writer.begin().await.map_err(query_error)?;
    let mut inserted = 0;
    for (start, end) in &intervals {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO time_slots (start_time, end_time, is_booked) VALUES (?, ?, 0)",
        )
        .bind(format_datetime(start))
        .bind(format_datetime(end))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;
        inserted += result.rows_affected();
    }
    tx.commit().await.map_err(query_error)?;

    tracing::info!(
        date = %plan.date,
        planned = intervals.len(),
        inserted,
        "seeded time slots"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
    }

    #[test]
    fn test_default_plan_has_sixteen_slots() {
        let intervals = SeedPlan::for_day(day()).intervals().unwrap();
        assert_eq!(intervals.len(), 16);
        assert_eq!(intervals[0].0.to_rfc3339(), "2025-09-30T09:00:00+00:00");
        assert_eq!(intervals[15].1.to_rfc3339(), "2025-09-30T17:00:00+00:00");
        assert!(intervals.windows(2).all(|w| w[0].1 == w[1].0));
    }

    #[test]
    fn test_remainder_is_dropped() {
        let plan = SeedPlan {
            slot_minutes: 45,
            ..SeedPlan::for_day(day())
        };
        // 8 hours = 480 minutes -> 10 full 45-minute slots
        assert_eq!(plan.intervals().unwrap().len(), 10);
    }

    #[test]
    fn test_invalid_plans() {
        let zero = SeedPlan {
            slot_minutes: 0,
            ..SeedPlan::for_day(day())
        };
        assert!(matches!(zero.intervals(), Err(SeedError::InvalidPlan(_))));

        let inverted = SeedPlan {
            opening_hour: 17,
            closing_hour: 9,
            ..SeedPlan::for_day(day())
        };
        assert!(matches!(inverted.intervals(), Err(SeedError::InvalidPlan(_))));

        let late = SeedPlan {
            closing_hour: 25,
            ..SeedPlan::for_day(day())
        };
        assert!(matches!(late.intervals(), Err(SeedError::InvalidPlan(_))));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("seed.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();

        let plan = SeedPlan::for_day(day());
        assert_eq!(seed_slots(&pool, &plan).await.unwrap(), 16);
        assert_eq!(seed_slots(&pool, &plan).await.unwrap(), 0);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM time_slots")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count, 16);
    }

    #[tokio::test]
    async fn test_full_day_plan() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("full.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();

        let plan = SeedPlan {
            opening_hour: 0,
            closing_hour: 24,
            slot_minutes: 60,
            ..SeedPlan::for_day(day())
        };
        assert_eq!(seed_slots(&pool, &plan).await.unwrap(), 24);
    }
}
