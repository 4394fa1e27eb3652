//! HTTP server module with optional TLS.
//!
//! Two modes:
//! - **None**: plain HTTP (development or behind a TLS-terminating proxy)
//! - **Manual**: user-provided PEM certificate and key
//!
//! The server includes:
//! - HTTP to HTTPS redirect (manual mode, when enabled)
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Certificate hot-reload via SIGHUP (manual mode)

mod redirect;
mod server;
mod shutdown;

pub use server::{start_server, ServerError};
