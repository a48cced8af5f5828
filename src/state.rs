//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::upload::UploadStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// Where point images land; served back under `/uploads`.
    pub uploads: UploadStore,
}
