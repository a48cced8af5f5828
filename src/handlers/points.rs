//! Point handlers: search, create (multipart with image), show.

use crate::error::AppError;
use crate::extractors::PointForm;
use crate::models::{parse_item_ids, ItemView, NewPoint, Point, PointDetail, PointView, PointsQuery};
use crate::service::{validate_point_form, PointService};
use crate::sql::PointFilter;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;

pub const POINT_NOT_FOUND: &str = "Point not found";

fn point_view(state: &AppState, point: Point) -> PointView {
    let image_url = state.config.image_url(&point.image);
    PointView { point, image_url }
}

impl From<PointsQuery> for PointFilter {
    fn from(q: PointsQuery) -> Self {
        PointFilter {
            city: q.city,
            uf: q.uf,
            item_ids: q.itens.as_deref().map(parse_item_ids),
        }
    }
}

/// GET /points?city=&uf=&itens=1,2
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> Result<Json<Vec<PointView>>, AppError> {
    let filter = PointFilter::from(query);
    let points = PointService::list(&state.pool, &filter).await?;
    Ok(Json(points.into_iter().map(|p| point_view(&state, p)).collect()))
}

/// POST /points: validate everything first, then store the image and insert in one transaction.
/// The stored image is removed again when the insert fails.
pub async fn create(
    State(state): State<AppState>,
    form: PointForm,
) -> Result<Json<PointView>, AppError> {
    validate_point_form(&form)?;
    let image = form
        .image
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("\"image\" is required".into()))?;
    let mut new_point = new_point_from_fields(&form.fields)?;
    new_point.image = state.uploads.save(image).await?;

    match PointService::create(&state.pool, &new_point).await {
        Ok((point, _)) => Ok(Json(point_view(&state, point))),
        Err(e) => {
            state.uploads.remove(&new_point.image).await;
            Err(e)
        }
    }
}

/// GET /points/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointDetail>, AppError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::NotFound(POINT_NOT_FOUND.into()))?;
    let point = PointService::find(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(POINT_NOT_FOUND.into()))?;
    let itens = PointService::items_of(&state.pool, id)
        .await?
        .into_iter()
        .map(|item| {
            let url = state.config.image_url(&item.image);
            ItemView::new(item, url)
        })
        .collect();
    Ok(Json(PointDetail {
        point: point_view(&state, point),
        itens,
    }))
}

/// Typed point from already-validated fields; `image` is left empty for the caller to fill.
pub fn new_point_from_fields(fields: &HashMap<String, String>) -> Result<NewPoint, AppError> {
    let text = |key: &str| -> Result<String, AppError> {
        fields
            .get(key)
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::BadRequest(format!("\"{}\" is required", key)))
    };
    let number = |key: &str| -> Result<f64, AppError> {
        text(key)?
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("\"{}\" must be a number", key)))
    };

    let mut itens: Vec<i32> = Vec::new();
    for id in parse_item_ids(&text("itens")?) {
        if !itens.contains(&id) {
            itens.push(id);
        }
    }
    if itens.is_empty() {
        return Err(AppError::BadRequest("\"itens\" must list at least one item".into()));
    }

    Ok(NewPoint {
        image: String::new(),
        name: text("name")?,
        email: text("email")?,
        whatsapp: text("whatsapp")?,
        latitude: number("latitude")?,
        longitude: number("longitude")?,
        city: text("city")?,
        uf: text("uf")?,
        itens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn builds_point_and_dedups_items() {
        let f = fields(&[
            ("name", "Mercado"),
            ("email", "a@b.com"),
            ("whatsapp", "27999999999"),
            ("latitude", "-20.3155"),
            ("longitude", " -40.3128"),
            ("city", "Vitória"),
            ("uf", "ES"),
            ("itens", "2, 1, 2"),
        ]);
        let p = new_point_from_fields(&f).unwrap();
        assert_eq!(p.itens, vec![2, 1]);
        assert_eq!(p.latitude, -20.3155);
        assert_eq!(p.longitude, -40.3128);
        assert_eq!(p.city, "Vitória");
        assert!(p.image.is_empty());
    }

    #[test]
    fn missing_field_is_a_bad_request() {
        let f = fields(&[("name", "Mercado")]);
        assert!(matches!(new_point_from_fields(&f), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn query_becomes_filter() {
        let filter = PointFilter::from(PointsQuery {
            city: Some("Vitória".into()),
            uf: Some("ES".into()),
            itens: Some("1, x,2".into()),
        });
        assert_eq!(filter.item_ids, Some(vec![1, 2]));
        assert_eq!(filter.uf.as_deref(), Some("ES"));
        assert!(PointFilter::from(PointsQuery::default()).item_ids.is_none());
    }
}
