//! Application services sitting between the GraphQL layer and the store

pub mod auth;
pub mod catalog;

pub use auth::{AuthConfig, AuthService};
pub use catalog::{CatalogService, NewBook, NewReview};
