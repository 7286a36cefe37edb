//! hopeboard-server: HTTP API for the hope project
//!
//! Accounts and bearer sessions, moodboards, letters of encouragement and
//! self-care resources, served by axum over a pluggable `Store`.

pub mod auth;
pub mod http;
pub mod store;

pub use http::{build_router, open_store, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use store::{Counts, MemoryStore, PgStore, Store, StoreError};
