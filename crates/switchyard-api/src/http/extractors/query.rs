//! Query parameter extractors.
//!
//! `ValidatedQuery` wraps axum's `Query` so that missing or mistyped
//! parameters come back as a 422 with the usual error body instead of
//! axum's plain-text 400.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use switchyard_types::slot::{DEFAULT_PAGE_SIZE, SlotId};

use crate::http::error::AppError;

/// Largest `page_size` accepted at the HTTP layer. Values above the service's
/// own limit but within this bound reach the service and get its 400.
pub const MAX_REQUESTED_PAGE_SIZE: i64 = 100;

/// Query string extractor that rejects with `AppError::Validation`.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query parameters for `GET /assign`.
#[derive(Debug, Deserialize)]
pub struct AssignQuery {
    pub experiment_name: String,
    pub user_id: String,
}

impl AssignQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.experiment_name.is_empty() {
            return Err(AppError::Validation("experiment_name cannot be empty".to_string()));
        }
        if self.user_id.is_empty() {
            return Err(AppError::Validation("user_id cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Query parameters for `GET /availability/`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

impl AvailabilityQuery {
    /// Range-check and narrow to `(page, page_size)`.
    pub fn validate(&self) -> Result<(u32, u32), AppError> {
        let page = u32::try_from(self.page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| AppError::Validation(format!("page must be >= 1, got {}", self.page)))?;

        if !(1..=MAX_REQUESTED_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {MAX_REQUESTED_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        // In range 1..=100, so the narrowing cannot fail.
        Ok((page, self.page_size as u32))
    }
}

/// Query parameters for `POST /availability/book`.
#[derive(Debug, Deserialize)]
pub struct BookQuery {
    pub slot_id: SlotId,
    pub email: String,
}
