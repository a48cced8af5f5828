//! Operational routes for an Ecoleta deployment: liveness, readiness of the database and the
//! image directory behind `/uploads`, and build version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
    uploads: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn uploads_dir_status(dir: &Path) -> &'static str {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => "ok",
        Ok(_) => "not a directory",
        Err(_) => "missing",
    }
}

/// 200 when points can be stored and their images served; 503 otherwise.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let database = match sqlx::query("SELECT 1").fetch_optional(&state.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "database not ready");
            "unavailable"
        }
    };
    let uploads = uploads_dir_status(state.uploads.dir()).await;
    if uploads != "ok" {
        tracing::warn!(dir = %state.uploads.dir().display(), uploads, "upload dir not ready");
    }
    if database == "ok" && uploads == "ok" {
        (StatusCode::OK, Json(ReadyBody { status: "ok", database, uploads }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody { status: "degraded", database, uploads }),
        )
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /ready, GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
