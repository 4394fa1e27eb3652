//! Almanac - weather forecast service
//!
//! Serves weather forecasts stored in SQLite over HTTP, seeds the store with
//! a default dataset on first start, and reports store health.

pub mod app;
pub mod config;
pub mod error;
pub mod forecasts;
pub mod health;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use app::{initialize, initialize_at, StartupError};
pub use error::AppError;
