//! IBGE localities API: Brazilian states (UF codes) and the cities of a state.
//!
//! Endpoints used:
//! - `GET {base}/api/v1/localidades/estados` → `[{ "id": 32, "sigla": "ES", "nome": "Espírito Santo", ... }]`
//! - `GET {base}/api/v1/localidades/estados/{uf}/municipios` → `[{ "id": 3205309, "nome": "Vitória", ... }]`

use crate::client::error::ClientError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const IBGE_BASE_URL: &str = "https://servicodados.ibge.gov.br";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IbgeState {
    pub sigla: String,
    #[serde(default)]
    pub nome: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IbgeCity {
    pub nome: String,
}

#[derive(Clone, Debug)]
pub struct IbgeClient {
    client: Client,
    base_url: String,
}

impl IbgeClient {
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, IBGE_BASE_URL))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        IbgeClient { client, base_url }
    }

    pub fn states_url(&self) -> String {
        format!("{}/api/v1/localidades/estados", self.base_url)
    }

    pub fn cities_url(&self, uf: &str) -> String {
        format!("{}/api/v1/localidades/estados/{}/municipios", self.base_url, uf)
    }

    /// UF codes in the order IBGE returns them.
    pub async fn ufs(&self) -> Result<Vec<String>, ClientError> {
        let states: Vec<IbgeState> = self.get(&self.states_url()).await?;
        Ok(state_codes(states))
    }

    /// City names of one state.
    pub async fn cities(&self, uf: &str) -> Result<Vec<String>, ClientError> {
        let cities: Vec<IbgeCity> = self.get(&self.cities_url(uf)).await?;
        Ok(city_names(cities))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        tracing::debug!(url, "ibge request");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }
}

pub fn state_codes(states: Vec<IbgeState>) -> Vec<String> {
    states.into_iter().map(|s| s.sigla).collect()
}

pub fn city_names(cities: Vec<IbgeCity>) -> Vec<String> {
    cities.into_iter().map(|c| c.nome).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_states_ignoring_extra_fields() {
        let body = r#"[
            {"id": 32, "sigla": "ES", "nome": "Espírito Santo", "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}},
            {"id": 33, "sigla": "RJ", "nome": "Rio de Janeiro", "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}}
        ]"#;
        let states: Vec<IbgeState> = serde_json::from_str(body).unwrap();
        assert_eq!(state_codes(states), vec!["ES", "RJ"]);
    }

    #[test]
    fn decodes_cities() {
        let body = r#"[{"id": 3205309, "nome": "Vitória", "microrregiao": {}}, {"id": 3205002, "nome": "Serra"}]"#;
        let cities: Vec<IbgeCity> = serde_json::from_str(body).unwrap();
        assert_eq!(city_names(cities), vec!["Vitória", "Serra"]);
    }

    #[test]
    fn builds_urls() {
        let ibge = IbgeClient::with_client(Client::new(), "http://ibge.test/");
        assert_eq!(ibge.states_url(), "http://ibge.test/api/v1/localidades/estados");
        assert_eq!(
            ibge.cities_url("ES"),
            "http://ibge.test/api/v1/localidades/estados/ES/municipios"
        );
    }
}
