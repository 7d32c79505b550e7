//! # FastVinted Shared Library
//!
//! Types, persistence and auth primitives used by the FastVinted API server
//! and its HTTP client.
//!
//! ## Module Organization
//!
//! - `models`: database models and their queries
//! - `auth`: passwords, bearer tokens, the integration key, ownership checks
//! - `db`: connection pool and embedded migrations
//! - `pagination`: item listing parameters and sorting
//! - `tags`: search tag parsing and validation

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod tags;

/// Current version of the FastVinted shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
