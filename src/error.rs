//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key} '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// One violated rule on one request field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

impl FieldError {
    pub fn new(key: &str, message: impl Into<String>) -> Self {
        FieldError {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}

/// Body for `NotFound`, `BadRequest` and internal failures.
#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Aggregate validation failure: every violated field is listed under `validation.keys`.
#[derive(Serialize)]
pub struct ValidationBody {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: &'static str,
    pub message: String,
    pub validation: ValidationDetail,
}

#[derive(Serialize)]
pub struct ValidationDetail {
    pub source: &'static str,
    pub keys: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                let body = ValidationBody {
                    status_code: StatusCode::BAD_REQUEST.as_u16(),
                    error: "Bad Request",
                    message: join_messages(&errors),
                    validation: ValidationDetail {
                        source: "body",
                        keys: errors.into_iter().map(|e| e.key).collect(),
                    },
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::NotFound(message) | AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
            }
            AppError::PayloadTooLarge(message) => {
                (StatusCode::PAYLOAD_TOO_LARGE, Json(MessageBody { message })).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageBody {
                        message: "internal server error".into(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
