//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! Services are generic over repository/hasher traits, but AppState pins them
//! to the concrete infra implementations. CLI commands that only need one
//! half (experiments or slots) build it directly with the helpers below.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use switchyard_core::service::bucketer::ExperimentSelector;
use switchyard_core::service::slot::SlotService;
use switchyard_infra::config::load_experiments;
use switchyard_infra::crypto::hash::Sha256ContentHasher;
use switchyard_infra::sqlite::pool::DatabasePool;
use switchyard_infra::sqlite::slot::SqliteSlotRepository;
use switchyard_types::config::ServiceConfig;
use switchyard_types::experiment::ExperimentCatalog;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSelector = ExperimentSelector<Sha256ContentHasher>;

pub type ConcreteSlotService = SlotService<SqliteSlotRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub selector: Arc<ConcreteSelector>,
    pub slot_service: Arc<ConcreteSlotService>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load experiments, connect to DB,
    /// wire services. A missing or malformed experiments file is fatal.
    pub async fn init(config: &ServiceConfig) -> anyhow::Result<Self> {
        let selector = build_selector(config).await?;
        let db_pool = open_database(config).await?;
        Ok(Self::from_parts(config, selector, db_pool))
    }

    /// Assemble state from already-loaded parts.
    pub fn from_parts(
        config: &ServiceConfig,
        selector: ConcreteSelector,
        db_pool: DatabasePool,
    ) -> Self {
        let slot_service = build_slot_service(config, db_pool.clone());
        Self {
            selector: Arc::new(selector),
            slot_service: Arc::new(slot_service),
            db_pool,
        }
    }
}

/// Load the experiment catalog named in the config and build the selector.
pub async fn build_selector(config: &ServiceConfig) -> anyhow::Result<ConcreteSelector> {
    let catalog = load_experiments(Path::new(&config.experiments_path))
        .await
        .context("failed to load experiment configuration")?;
    Ok(selector_from_catalog(catalog))
}

pub fn selector_from_catalog(catalog: ExperimentCatalog) -> ConcreteSelector {
    ExperimentSelector::new(catalog, Sha256ContentHasher::new())
}

/// Connect to the slot database, running migrations.
pub async fn open_database(config: &ServiceConfig) -> anyhow::Result<DatabasePool> {
    DatabasePool::new(&config.database_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))
}

pub fn build_slot_service(config: &ServiceConfig, db_pool: DatabasePool) -> ConcreteSlotService {
    SlotService::new(SqliteSlotRepository::new(db_pool))
        .with_max_page_size(config.max_page_size)
        .with_booking_timeout(Duration::from_millis(config.booking_timeout_ms))
}
