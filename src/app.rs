//! Application state and HTTP router construction.
//!
//! Used by `main` and by the HTTP-level tests to build the Axum app.

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{BookshelfSchema, build_schema};
use crate::services::{AuthConfig, AuthService};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub schema: BookshelfSchema,
    pub auth: AuthService,
}

impl AppState {
    /// Wire services and schema over an opened database
    pub fn new(config: &Config, db: Database) -> Self {
        let auth = AuthService::new(db.clone(), AuthConfig::from_config(config));
        let schema = build_schema(db.clone(), auth.clone());
        Self {
            db,
            schema,
            auth,
        }
    }
}

/// Build the full Axum router: /graphql, health probes and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::graphql::router())
        .merge(api::health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
