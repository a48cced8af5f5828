mod api;
mod common;

pub use api::{api_routes, app_router};
pub use common::common_routes;
