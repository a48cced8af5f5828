//! Item catalog handler.

use crate::error::AppError;
use crate::models::ItemView;
use crate::service::ItemService;
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /itens
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ItemView>>, AppError> {
    let itens = ItemService::list(&state.pool).await?;
    Ok(Json(
        itens
            .into_iter()
            .map(|item| {
                let url = state.config.image_url(&item.image);
                ItemView::new(item, url)
            })
            .collect(),
    ))
}
