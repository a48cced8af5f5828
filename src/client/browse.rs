//! State behind the "find collection points" screen: item filter chips over a map of points.

use crate::client::api::EcoletaClient;
use crate::client::error::ClientError;
use crate::client::selection::ItemSelection;
use crate::models::{ItemView, PointDetail, PointView, PointsQuery};

#[derive(Clone, Debug)]
pub struct PointsBrowser {
    uf: String,
    city: String,
    itens: Vec<ItemView>,
    selected: ItemSelection,
    position: Option<(f64, f64)>,
    points: Vec<PointView>,
}

impl PointsBrowser {
    pub fn new(uf: impl Into<String>, city: impl Into<String>) -> Self {
        PointsBrowser {
            uf: uf.into(),
            city: city.into(),
            itens: Vec::new(),
            selected: ItemSelection::default(),
            position: None,
            points: Vec::new(),
        }
    }

    pub fn set_itens(&mut self, itens: Vec<ItemView>) {
        self.itens = itens;
    }

    pub fn itens(&self) -> &[ItemView] {
        &self.itens
    }

    pub fn toggle_item(&mut self, id: i32) -> bool {
        self.selected.toggle(id)
    }

    pub fn is_selected(&self, id: i32) -> bool {
        self.selected.contains(id)
    }

    /// Device location; the map is only shown once it is known.
    pub fn set_position(&mut self, latitude: f64, longitude: f64) {
        self.position = Some((latitude, longitude));
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    /// Points query for the current city/uf. With no item picked, every catalog item is used.
    pub fn query(&self) -> PointsQuery {
        if self.selected.is_empty() {
            let all: Vec<i32> = self.itens.iter().map(|i| i.id).collect();
            PointsQuery::new(self.city.clone(), self.uf.clone(), &all)
        } else {
            PointsQuery::new(self.city.clone(), self.uf.clone(), self.selected.ids())
        }
    }

    pub fn set_points(&mut self, points: Vec<PointView>) {
        self.points = points;
    }

    pub fn points(&self) -> &[PointView] {
        &self.points
    }

    /// Load the catalog when it is still empty, then the points matching `query()`.
    pub async fn refresh(&mut self, api: &EcoletaClient) -> Result<&[PointView], ClientError> {
        if self.itens.is_empty() {
            self.itens = api.itens().await?;
        }
        self.points = api.points(&self.query()).await?;
        Ok(&self.points)
    }

    /// Detail for a tapped marker.
    pub async fn detail(&self, api: &EcoletaClient, point_id: i32) -> Result<Option<PointDetail>, ClientError> {
        api.point(point_id).await
    }
}
