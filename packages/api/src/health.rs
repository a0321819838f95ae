// ABOUTME: Health check endpoint
// ABOUTME: Reports service status, version, and database reachability

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::db::DbState;

pub async fn health_check(State(db): State<DbState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(&db.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Health check could not reach the database: {}", e);
            "unavailable"
        }
    };

    let status = if database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database == "ok" { "healthy" } else { "degraded" },
            "timestamp": Utc::now().timestamp(),
            "version": env!("CARGO_PKG_VERSION"),
            "service": "scansheet",
            "database": database,
        })),
    )
}
