//! # Todo Shared Library
//!
//! This crate contains the storage layer and data models used by the todo
//! API server.
//!
//! ## Module Organization
//!
//! - `db`: SQLite pool, schema bootstrap and the persistence gateway
//! - `models`: Todo and User records and their queries
//! - `auth`: Password hashing

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the todo shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
