//! First-run seeding of the forecast store.
//!
//! The check (`is_empty`) and the insert are two separate store calls. Within a
//! single process this runs once before the listener is bound, so no request
//! can interleave. Two processes starting against the same empty database can
//! both observe it as empty and both insert.

use chrono::{Days, NaiveDate};

use super::{ForecastRecord, ForecastStore, StoreError};

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and this many default records were inserted
    Seeded(usize),
    /// The store already held data; nothing was inserted
    Skipped,
}

/// The fixed default dataset: three consecutive days starting at `today`.
pub fn default_forecasts(today: NaiveDate) -> Vec<ForecastRecord> {
    [(0, 25, "Sunny"), (1, 22, "Cloudy"), (2, 18, "Rainy")]
        .into_iter()
        .map(|(offset, temperature_c, summary)| {
            ForecastRecord::new(today + Days::new(offset), temperature_c, summary)
        })
        .collect()
}

/// Insert the default dataset iff the store holds no rows.
pub async fn seed_if_empty(
    store: &ForecastStore,
    today: NaiveDate,
) -> Result<SeedOutcome, StoreError> {
    if !store.is_empty().await? {
        tracing::info!("Forecast store already populated, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let inserted = store.insert_all(&default_forecasts(today)).await?;
    tracing::info!(records = inserted, %today, "Seeded forecast store with default data");

    Ok(SeedOutcome::Seeded(inserted))
}
