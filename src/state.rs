//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::forecasts::ForecastService;
use crate::health::{HealthReporter, StoreProbe};
use crate::store::ForecastStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything a handler touches is constructed once at startup and passed in
/// here; handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ForecastStore,
    pub forecasts: ForecastService,
    pub health: Arc<HealthReporter>,
}

impl AppState {
    /// Wire the query service and health probes to an initialized store.
    pub fn new(config: AppConfig, store: ForecastStore) -> Self {
        let health = HealthReporter::new().with_probe(StoreProbe::new(store.clone()));

        Self {
            config: Arc::new(config),
            forecasts: ForecastService::new(store.clone()),
            store,
            health: Arc::new(health),
        }
    }
}
