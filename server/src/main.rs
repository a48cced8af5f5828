//! Ecoleta server: loads configuration from env (and `.env`), ensures the database and tables exist,
//! seeds the item catalog and its icons, and serves the API plus uploaded images.
//!
//! Run from repo root: `cargo run -p ecoleta-server`

use ecoleta::{
    app_router, apply_migrations, ensure_database_exists, seed_itens, AppConfig, AppState, UploadStore,
    CATALOG_IMAGES,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("ecoleta=info,ecoleta_server=info,tower_http=info")
            }),
        )
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    apply_migrations(&pool).await?;
    let seeded = seed_itens(&pool).await?;
    if seeded > 0 {
        tracing::info!(count = seeded, "seeded item catalog");
    }

    let uploads = UploadStore::new(&config.upload_dir);
    uploads.ensure_dir().await?;
    let icons = uploads.install(CATALOG_IMAGES).await?;
    if icons > 0 {
        tracing::info!(count = icons, dir = %uploads.dir().display(), "installed item icons");
    }

    let bind_addr = config.bind_addr;
    let state = AppState {
        pool,
        config: Arc::new(config),
        uploads,
    };

    let app = app_router(state);
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
