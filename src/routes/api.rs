//! Ecoleta API routes and the full application router.

use crate::config::UPLOADS_PATH;
use crate::handlers::{items, points};
use crate::routes::common_routes;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

async fn hello() -> Json<&'static str> {
    Json("Hello")
}

/// GET /, GET /itens, GET|POST /points, GET /points/:id.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/itens", get(items::index))
        .route("/points", get(points::index).post(points::create))
        .route("/points/:id", get(points::show))
        .with_state(state)
}

/// Everything the server exposes: common routes, API, stored images under `/uploads`,
/// with a body size cap, permissive CORS and request tracing.
pub fn app_router(state: AppState) -> Router {
    let upload_dir = state.uploads.dir().to_path_buf();
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(api_routes(state))
        .nest_service(UPLOADS_PATH, ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
