//! SQLite-backed tenant-scoped image cache.
//!
//! This module provides a persistent cache using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Per-tenant image configs and per-(tenant, query) search results
//! - TTL expiry checked on read, with purge of stale rows
//! - A capacity bound enforced by evicting the oldest 20% of entries
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod key;
pub mod limiter_state;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use store::CacheStore;
