//! Core library surface for the inward register TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the integration tests can reuse the same pieces.

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod nav;
pub mod ui;

/// Convenience re-exports for the persistence layer. These are typically used
/// by `main.rs` to initialize the embedded SQLite slot and hydrate the store.
pub use db::{ensure_schema, RecordStore};

/// The primary domain types that other layers manipulate.
pub use models::{Record, Status};

/// Startup configuration and the navigation fragment loader.
pub use config::Config;
pub use nav::NavBar;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
