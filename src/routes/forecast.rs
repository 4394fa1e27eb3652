//! Handler for the forecast listing.

use axum::{extract::State, Json};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::ForecastRecord;

/// Returns every stored forecast as a JSON array.
#[instrument(name = "forecast::list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ForecastRecord>>, AppError> {
    let forecasts = state.forecasts.get_all().await?;
    Ok(Json(forecasts))
}
