//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/assign", get(handlers::experiment::assign))
        // Listing answers with and without the trailing slash.
        .route("/availability", get(handlers::availability::list_slots))
        .route("/availability/", get(handlers::availability::list_slots))
        .route("/availability/book", post(handlers::availability::book_slot))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus a database round-trip.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let (status, label) = match state.db_pool.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::error!(error = %e, "health check database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(serde_json::json!({
            "status": label,
            "service": "switchyard",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::NaiveDate;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use switchyard_infra::sqlite::pool::DatabasePool;
    use switchyard_infra::sqlite::seed::{seed_slots, SeedPlan};
    use switchyard_types::config::ServiceConfig;
    use switchyard_types::experiment::ExperimentCatalog;

    use crate::state::selector_from_catalog;

    /// Router over a fresh database seeded with 16 half-hour slots.
    /// The `TempDir` must stay alive for the duration of the test.
    async fn test_router() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
        seed_slots(&pool, &SeedPlan::for_day(day)).await.unwrap();

        let catalog: ExperimentCatalog = serde_json::from_value(serde_json::json!({
            "split": { "variants": ["A", "B"], "weights": [50, 50] },
            "broken": { "variants": ["A", "B"], "weights": [60, 60] },
            "lopsided": { "variants": ["A", "B", "C"], "weights": [50, 50] },
        }))
        .unwrap();

        let config = ServiceConfig::default();
        let state = AppState::from_parts(&config, selector_from_catalog(catalog), pool);
        (build_router(state), dir)
    }

    async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
        send(router, Method::GET, uri).await
    }

    async fn post(router: &Router, uri: &str) -> (StatusCode, Value) {
        send(router, Method::POST, uri).await
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _dir) = test_router().await;
        let (status, body) = get(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "switchyard");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_assign_returns_variant() {
        let (router, _dir) = test_router().await;

        // sha256("u1_split") lands on position 39, inside A's [0, 50).
        let (status, body) = get(&router, "/assign?experiment_name=split&user_id=u1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["experiment_name"], "split");
        assert_eq!(body["variant"], "A");

        let (_, again) = get(&router, "/assign?experiment_name=split&user_id=u1").await;
        assert_eq!(again, body);
    }

    #[tokio::test]
    async fn test_assign_errors() {
        let (router, _dir) = test_router().await;

        let (status, body) = get(&router, "/assign?experiment_name=nope&user_id=u1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Experiment not found");

        let (status, _) = get(&router, "/assign?experiment_name=broken&user_id=u1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = get(&router, "/assign?experiment_name=lopsided&user_id=u1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = get(&router, "/assign?experiment_name=split").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Validation error");

        let (status, _) = get(&router, "/assign?experiment_name=split&user_id=").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_availability_defaults() {
        let (router, _dir) = test_router().await;

        for uri in ["/availability/", "/availability"] {
            let (status, body) = get(&router, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["slots"].as_array().unwrap().len(), 10);
            assert_eq!(body["pagination"]["page"], 1);
            assert_eq!(body["pagination"]["page_size"], 10);
            assert_eq!(body["pagination"]["total_count"], 16);
            assert_eq!(body["pagination"]["total_pages"], 2);
            assert_eq!(body["pagination"]["has_next"], true);
            assert_eq!(body["pagination"]["has_prev"], false);
            assert_eq!(body["slots"][0]["start_time"], "2025-09-30T09:00:00Z");
        }
    }

    #[tokio::test]
    async fn test_availability_last_page() {
        let (router, _dir) = test_router().await;
        let (status, body) = get(&router, "/availability/?page=2&page_size=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"].as_array().unwrap().len(), 6);
        assert_eq!(body["pagination"]["has_next"], false);
        assert_eq!(body["pagination"]["has_prev"], true);

        let (status, body) = get(&router, "/availability/?page=9").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["slots"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_availability_page_size_limits() {
        let (router, _dir) = test_router().await;

        let (status, body) = get(&router, "/availability/?page_size=16").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"].as_array().unwrap().len(), 16);

        let (status, body) = get(&router, "/availability/?page_size=17").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Page size exceeded");
        assert_eq!(body["max_page_size"], 16);

        for uri in [
            "/availability/?page_size=101",
            "/availability/?page_size=0",
            "/availability/?page=0",
            "/availability/?page=abc",
        ] {
            let (status, _) = get(&router, uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_booking_flow() {
        let (router, _dir) = test_router().await;

        let (status, body) =
            post(&router, "/availability/book?slot_id=1&email=a@example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slot_id"], 1);
        assert_eq!(body["email"], "a@example.com");
        assert_eq!(body["message"], "Slot 1 booked successfully for a@example.com");

        let (status, body) =
            post(&router, "/availability/book?slot_id=1&email=b@example.com").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Time slot already booked");

        let (status, _) = post(&router, "/availability/book?slot_id=999&email=a@example.com").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Booked slots drop out of the listing.
        let (_, body) = get(&router, "/availability/?page_size=16").await;
        assert_eq!(body["pagination"]["total_count"], 15);
        assert_eq!(body["slots"][0]["id"], 2);
    }

    #[tokio::test]
    async fn test_booking_validation() {
        let (router, _dir) = test_router().await;

        for uri in [
            "/availability/book?slot_id=1&email=not-an-email",
            "/availability/book?slot_id=1",
            "/availability/book?email=a@example.com",
            "/availability/book?slot_id=x&email=a@example.com",
        ] {
            let (status, _) = post(&router, uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }

        // Nothing was booked by the rejected requests.
        let (_, body) = get(&router, "/availability/").await;
        assert_eq!(body["pagination"]["total_count"], 16);
    }

    #[tokio::test]
    async fn test_concurrent_booking_has_one_winner() {
        let (router, _dir) = test_router().await;

        let mut handles = Vec::new();
        for i in 0..4 {
            let router = router.clone();
            handles.push(tokio::spawn(async move {
                let uri = format!("/availability/book?slot_id=3&email=user{i}@example.com");
                post(&router, &uri).await.0
            }));
        }

        let mut statuses = Vec::new();
        for handle in handles {
            statuses.push(handle.await.unwrap());
        }

        assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
        assert_eq!(
            statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
            3
        );
    }
}
