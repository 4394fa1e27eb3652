//! Startup sequence shared by the binary and the integration tests.
//!
//! Opens the store, brings the schema up to date and seeds it before any
//! request can be served. Any failure here aborts startup; the listener is
//! never bound against an unseeded or broken store.

use chrono::{Local, NaiveDate};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::store::{seed_if_empty, ForecastStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to open forecast store: {0}")]
    Connect(#[source] StoreError),

    #[error("Failed to initialize forecast schema: {0}")]
    Schema(#[source] StoreError),

    #[error("Failed to seed forecast store: {0}")]
    Seed(#[source] StoreError),
}

/// Connect, migrate and seed the store, then build the shared state.
///
/// `today` anchors the default dataset when the store turns out to be empty.
pub async fn initialize_at(config: AppConfig, today: NaiveDate) -> Result<AppState, StartupError> {
    let store = ForecastStore::connect(&config.database)
        .await
        .map_err(StartupError::Connect)?;

    store
        .initialize_schema()
        .await
        .map_err(StartupError::Schema)?;

    seed_if_empty(&store, today)
        .await
        .map_err(StartupError::Seed)?;

    Ok(AppState::new(config, store))
}

/// Same as [`initialize_at`], using the local calendar date.
pub async fn initialize(config: AppConfig) -> Result<AppState, StartupError> {
    initialize_at(config, Local::now().date_naive()).await
}
