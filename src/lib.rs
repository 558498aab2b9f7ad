//! Opensauce library
//!
//! GitHub discovery API with AI issue analysis, backed by a fail-open
//! cache-aside layer over an in-memory or Redis store.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod server;
pub mod services;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
