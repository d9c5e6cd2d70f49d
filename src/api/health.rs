//! Liveness and readiness routes for orchestrators
//!
//! `/healthz` never touches the store. `/readyz` runs a trivial query and
//! answers 503 while the database is unreachable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::AppState;
use crate::db::Database;

/// Body of `/healthz`
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version of the running binary
    pub version: &'static str,
}

/// Body of `/readyz`
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
}

async fn database_answers(db: &Database) -> bool {
    match sqlx::query("SELECT 1").fetch_one(db.pool()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed to reach the database");
            false
        }
    }
}

async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 200 with `ready: true` when SQLite responds, 503 otherwise
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database = database_answers(&state.db).await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyResponse {
            ready: database,
            database,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(liveness))
        .route("/readyz", get(readiness))
}
