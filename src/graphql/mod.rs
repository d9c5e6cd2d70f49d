//! GraphQL API for the book catalog
//!
//! Queries and mutations live in per-domain files under `queries/` and
//! `mutations/`; each defines a `#[derive(Default)]` struct with an
//! `#[Object]` impl, and `schema.rs` merges them into the roots with
//! `#[derive(MergedObject)]`.

pub mod auth;
pub mod filters;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthGuard, AuthUser};
pub use schema::{BookshelfSchema, MutationRoot, QueryRoot, build_schema};
