//! Concierge Storage crate - SQLite persistence for the assistant.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! `SqliteStore` implementation of `AssistantStore` covering sessions,
//! messages, and the knowledge catalog.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::SqliteStore;
