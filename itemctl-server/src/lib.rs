//! itemctl-server: HTTP CRUD API over a single item table
//!
//! Serves create/read/update/delete for items stored in SQLite.
//! The database pool is built by the caller, migrated with
//! [`db::migrations::run`], and handed to [`http::run_server`].

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, Item, ItemRepo};
pub use http::{router, run_server, ApiError, ServerConfig};
