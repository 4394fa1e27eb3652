//! HTTP route handlers.
//!
//! Forecast and health responses are never cacheable: both must reflect the
//! store at request time. Every request is wrapped in a span carrying a
//! generated request ID so all logs for one request can be correlated.

pub mod forecast;
pub mod health;
pub mod home;

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::{middleware, routing::get, Router};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    let forecast_routes = Router::new()
        .route("/weatherforecast", get(forecast::list))
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let home_routes = Router::new().route("/", get(home::index));

    Router::new()
        .merge(forecast_routes)
        .merge(home_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
