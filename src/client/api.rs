//! Typed client for the Ecoleta REST API.

use crate::client::error::ClientError;
use crate::client::form::PointSubmission;
use crate::models::{ItemView, PointDetail, PointView, PointsQuery};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Message the server sends with a 400 when a point id does not exist.
const POINT_NOT_FOUND: &str = "Point not found";

#[derive(Clone, Debug)]
pub struct EcoletaClient {
    client: Client,
    base_url: String,
}

impl EcoletaClient {
    /// `base_url` is the server root, e.g. `http://localhost:3333`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        EcoletaClient { client, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn itens(&self) -> Result<Vec<ItemView>, ClientError> {
        let resp = self.client.get(self.url("itens")).send().await?;
        json(resp).await
    }

    pub async fn points(&self, query: &PointsQuery) -> Result<Vec<PointView>, ClientError> {
        let resp = self.client.get(self.url("points")).query(query).send().await?;
        json(resp).await
    }

    /// `Ok(None)` when the server reports the point as not found.
    pub async fn point(&self, id: i32) -> Result<Option<PointDetail>, ClientError> {
        let resp = self.client.get(self.url(&format!("points/{}", id))).send().await?;
        match json(resp).await {
            Err(ClientError::Status { status: 400, message }) if message == POINT_NOT_FOUND => Ok(None),
            other => other.map(Some),
        }
    }

    pub async fn create_point(&self, submission: PointSubmission) -> Result<PointView, ClientError> {
        let form = submission.into_multipart()?;
        let resp = self
            .client
            .post(self.url("points"))
            .multipart(form)
            .send()
            .await?;
        json(resp).await
    }
}

async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }
    Ok(resp.json().await?)
}

/// The `message` field of a JSON error body, or the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
