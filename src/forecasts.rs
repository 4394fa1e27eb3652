//! Read-only access to the stored forecasts.

use crate::store::{ForecastRecord, ForecastStore, StoreError};

/// Serves the full forecast list. Every call reads the store afresh.
#[derive(Clone, Debug)]
pub struct ForecastService {
    store: ForecastStore,
}

impl ForecastService {
    pub fn new(store: ForecastStore) -> Self {
        Self { store }
    }

    /// Fetch every stored forecast. Store failures are returned, never hidden
    /// behind an empty list.
    pub async fn get_all(&self) -> Result<Vec<ForecastRecord>, StoreError> {
        tracing::info!("Fetching weather forecasts");
        let forecasts = self.store.list_all().await?;
        tracing::debug!(count = forecasts.len(), "Fetched weather forecasts");
        Ok(forecasts)
    }
}
