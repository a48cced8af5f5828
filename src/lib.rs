//! Ecoleta: register and discover waste-collection points by city/state and accepted material.
//!
//! Server side: axum routes over PostgreSQL (`routes`, `handlers`, `service`, `sql`).
//! Client side: typed API/IBGE clients and screen state (`client`).

pub mod client;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod upload;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, FieldError};
pub use migration::{apply_migrations, seed_itens, CATALOG_IMAGES, ITEM_CATALOG};
pub use models::{Item, ItemView, NewPoint, Point, PointDetail, PointItem, PointView, PointsQuery};
pub use routes::{api_routes, app_router, common_routes};
pub use service::{ItemService, PointService, RequestValidator};
pub use state::AppState;
pub use store::ensure_database_exists;
pub use upload::UploadStore;
