//! State behind the "register a collection point" screen.
//!
//! The screen loads three read-only sources (item catalog, IBGE states, IBGE cities of the picked
//! state), lets the user fill the contact fields, pick a state/city, click a map position, toggle
//! items and attach a photo, then submits everything as one multipart request.

use crate::client::api::EcoletaClient;
use crate::client::error::ClientError;
use crate::client::ibge::IbgeClient;
use crate::client::selection::ItemSelection;
use crate::models::{ItemView, PointView};
use reqwest::multipart::{Form, Part};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Whatsapp,
}

/// A photo picked on the device.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct CreatePointForm {
    name: String,
    email: String,
    whatsapp: String,
    itens: Vec<ItemView>,
    ufs: Vec<String>,
    cities: Vec<String>,
    selected_uf: Option<String>,
    selected_city: Option<String>,
    /// Where the map starts (usually the device location).
    initial_position: Option<(f64, f64)>,
    selected_position: Option<(f64, f64)>,
    selected_itens: ItemSelection,
    image: Option<ImageFile>,
}

impl CreatePointForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Whatsapp => self.whatsapp = value,
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Whatsapp => &self.whatsapp,
        }
    }

    pub fn set_itens(&mut self, itens: Vec<ItemView>) {
        self.itens = itens;
    }

    pub fn itens(&self) -> &[ItemView] {
        &self.itens
    }

    pub fn set_ufs(&mut self, ufs: Vec<String>) {
        self.ufs = ufs;
    }

    pub fn ufs(&self) -> &[String] {
        &self.ufs
    }

    /// Pick a state. A different state drops the picked city and the loaded city list.
    /// Returns true when the city list has to be (re)loaded.
    pub fn select_uf(&mut self, uf: impl Into<String>) -> bool {
        let uf = uf.into();
        if self.selected_uf.as_deref() == Some(uf.as_str()) {
            return false;
        }
        self.selected_uf = Some(uf);
        self.selected_city = None;
        self.cities.clear();
        true
    }

    pub fn selected_uf(&self) -> Option<&str> {
        self.selected_uf.as_deref()
    }

    /// Accept a city list fetched for `uf`. A list for a state that is no longer selected
    /// arrived late and is dropped; returns whether it was applied.
    pub fn receive_cities(&mut self, uf: &str, cities: Vec<String>) -> bool {
        if self.selected_uf.as_deref() != Some(uf) {
            tracing::debug!(uf, "dropping stale city list");
            return false;
        }
        self.cities = cities;
        true
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.selected_city = Some(city.into());
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    pub fn set_initial_position(&mut self, latitude: f64, longitude: f64) {
        self.initial_position = Some((latitude, longitude));
    }

    pub fn initial_position(&self) -> Option<(f64, f64)> {
        self.initial_position
    }

    /// Map click.
    pub fn pick_position(&mut self, latitude: f64, longitude: f64) {
        self.selected_position = Some((latitude, longitude));
    }

    pub fn selected_position(&self) -> Option<(f64, f64)> {
        self.selected_position
    }

    pub fn toggle_item(&mut self, id: i32) -> bool {
        self.selected_itens.toggle(id)
    }

    pub fn selected_itens(&self) -> &ItemSelection {
        &self.selected_itens
    }

    pub fn attach_image(&mut self, image: ImageFile) {
        self.image = Some(image);
    }

    /// Snapshot of the form as it would be posted. Fails when the state, city or map position
    /// has not been picked; field contents are left to server-side validation.
    pub fn submission(&self) -> Result<PointSubmission, ClientError> {
        let uf = self
            .selected_uf
            .clone()
            .ok_or_else(|| ClientError::Incomplete("select a state (uf)".into()))?;
        let city = self
            .selected_city
            .clone()
            .ok_or_else(|| ClientError::Incomplete("select a city".into()))?;
        let (latitude, longitude) = self
            .selected_position
            .ok_or_else(|| ClientError::Incomplete("pick a position on the map".into()))?;

        Ok(PointSubmission {
            fields: vec![
                ("name", self.name.clone()),
                ("email", self.email.clone()),
                ("whatsapp", self.whatsapp.clone()),
                ("uf", uf),
                ("city", city),
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("itens", self.selected_itens.joined()),
            ],
            image: self.image.clone(),
        })
    }

    /// Load the item catalog and the state list concurrently.
    pub async fn load_sources(&mut self, api: &EcoletaClient, ibge: &IbgeClient) -> Result<(), ClientError> {
        let (itens, ufs) = tokio::join!(api.itens(), ibge.ufs());
        self.itens = itens?;
        self.ufs = ufs?;
        Ok(())
    }

    /// Fetch cities for the currently selected state, if any.
    pub async fn load_cities(&mut self, ibge: &IbgeClient) -> Result<(), ClientError> {
        let Some(uf) = self.selected_uf.clone() else {
            return Ok(());
        };
        let cities = ibge.cities(&uf).await?;
        self.receive_cities(&uf, cities);
        Ok(())
    }

    pub async fn submit(&self, api: &EcoletaClient) -> Result<PointView, ClientError> {
        api.create_point(self.submission()?).await
    }
}

/// Form data of `POST /points`, in the order the screen appends it.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSubmission {
    fields: Vec<(&'static str, String)>,
    image: Option<ImageFile>,
}

impl PointSubmission {
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn into_multipart(self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }
        if let Some(image) = self.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CreatePointForm {
        let mut form = CreatePointForm::new();
        form.set_field(FormField::Name, "Mercado do Zé");
        form.set_field(FormField::Email, "contato@mercado.com");
        form.set_field(FormField::Whatsapp, "27999999999");
        form.select_uf("ES");
        form.receive_cities("ES", vec!["Vitória".into(), "Serra".into()]);
        form.select_city("Vitória");
        form.pick_position(-20.3155, -40.3128);
        form.toggle_item(1);
        form.toggle_item(2);
        form
    }

    #[test]
    fn changing_state_clears_city() {
        let mut form = filled();
        assert!(!form.select_uf("ES"));
        assert_eq!(form.selected_city(), Some("Vitória"));
        assert!(form.select_uf("RJ"));
        assert_eq!(form.selected_city(), None);
        assert!(form.cities().is_empty());
    }

    #[test]
    fn late_city_list_for_previous_state_is_dropped() {
        let mut form = CreatePointForm::new();
        form.select_uf("ES");
        form.select_uf("RJ");
        assert!(!form.receive_cities("ES", vec!["Vitória".into()]));
        assert!(form.cities().is_empty());
        assert!(form.receive_cities("RJ", vec!["Niterói".into()]));
        assert_eq!(form.cities(), &["Niterói".to_string()]);
    }

    #[test]
    fn submission_carries_every_field() {
        let form = filled();
        let submission = form.submission().unwrap();
        assert_eq!(submission.get("name"), Some("Mercado do Zé"));
        assert_eq!(submission.get("uf"), Some("ES"));
        assert_eq!(submission.get("city"), Some("Vitória"));
        assert_eq!(submission.get("latitude"), Some("-20.3155"));
        assert_eq!(submission.get("longitude"), Some("-40.3128"));
        assert_eq!(submission.get("itens"), Some("1,2"));
        assert!(submission.image().is_none());
    }

    #[test]
    fn submission_needs_city_and_position() {
        let mut form = CreatePointForm::new();
        form.select_uf("ES");
        assert!(matches!(form.submission(), Err(ClientError::Incomplete(_))));
        form.select_city("Vitória");
        assert!(matches!(form.submission(), Err(ClientError::Incomplete(_))));
        form.pick_position(0.5, 0.5);
        assert!(form.submission().is_ok());
    }

    #[test]
    fn deselecting_first_item_updates_itens() {
        let mut form = filled();
        form.toggle_item(1);
        assert_eq!(form.submission().unwrap().get("itens"), Some("2"));
    }

    #[test]
    fn image_becomes_a_multipart_part() {
        let mut form = filled();
        form.attach_image(ImageFile {
            file_name: "fachada.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xff, 0xd8],
        });
        let submission = form.submission().unwrap();
        assert_eq!(submission.image().map(|i| i.file_name.as_str()), Some("fachada.jpg"));
        assert!(submission.into_multipart().is_ok());
    }
}
