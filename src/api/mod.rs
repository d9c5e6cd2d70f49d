//! HTTP route definitions
//!
//! The catalog API is GraphQL at /graphql. Health probes live beside it.

pub mod graphql;
pub mod health;
