//! Book catalog service: books, categories, reviews and accounts behind a
//! GraphQL API.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
pub use config::Config;
pub use db::Database;
pub use error::{CatalogError, CatalogResult};
