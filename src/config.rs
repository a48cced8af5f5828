//! Runtime configuration read from environment variables.
//!
//! | variable             | default                        |
//! |----------------------|--------------------------------|
//! | `DATABASE_URL`       | `postgres://localhost/ecoleta` |
//! | `BIND_ADDR`          | `0.0.0.0:3333`                 |
//! | `PUBLIC_URL`         | `http://localhost:3333`        |
//! | `UPLOAD_DIR`         | `uploads`                      |
//! | `MAX_UPLOAD_BYTES`   | `5242880`                      |
//! | `DB_MAX_CONNECTIONS` | `5`                            |

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/ecoleta";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3333";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3333";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Path under which stored images are served.
pub const UPLOADS_PATH: &str = "/uploads";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Scheme, host and port clients use to reach this server; prefixes every `image_url`.
    pub public_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3333)),
            public_url: DEFAULT_PUBLIC_URL.into(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let public_url = get("PUBLIC_URL", DEFAULT_PUBLIC_URL);
        if !(public_url.starts_with("http://") || public_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "PUBLIC_URL",
                value: public_url,
                reason: "must start with http:// or https://".into(),
            });
        }

        Ok(AppConfig {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: parse("BIND_ADDR", get("BIND_ADDR", DEFAULT_BIND_ADDR))?,
            public_url: public_url.trim_end_matches('/').to_string(),
            upload_dir: PathBuf::from(get("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: parse(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string()),
            )?,
            db_max_connections: parse(
                "DB_MAX_CONNECTIONS",
                get("DB_MAX_CONNECTIONS", &DEFAULT_DB_MAX_CONNECTIONS.to_string()),
            )?,
        })
    }

    /// Public URL of a stored image, e.g. `http://localhost:3333/uploads/oleo.svg`.
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}{}/{}", self.public_url, UPLOADS_PATH, filename)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.port(), 3333);
        assert_eq!(config.public_url, DEFAULT_PUBLIC_URL);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn image_url_uses_public_url_without_double_slash() {
        let config =
            AppConfig::from_lookup(lookup(&[("PUBLIC_URL", "http://192.168.15.7:3333/")])).unwrap();
        assert_eq!(
            config.image_url("lampadas.svg"),
            "http://192.168.15.7:3333/uploads/lampadas.svg"
        );
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("BIND_ADDR", "not-an-addr")])).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }

    #[test]
    fn public_url_needs_a_scheme() {
        assert!(AppConfig::from_lookup(lookup(&[("PUBLIC_URL", "localhost:3333")])).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("MAX_UPLOAD_BYTES", "  ")])).unwrap();
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
