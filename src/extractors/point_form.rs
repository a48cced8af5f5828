//! Multipart body of `POST /points`: text fields plus an optional `image` file part.

use crate::error::AppError;
use crate::upload::UploadedFile;
use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use std::collections::HashMap;

/// Name of the file part.
pub const IMAGE_FIELD: &str = "image";

/// Raw point submission. Nothing is validated here; see `service::validate_point_form`.
#[derive(Clone, Debug, Default)]
pub struct PointForm {
    pub fields: HashMap<String, String>,
    pub image: Option<UploadedFile>,
}

/// Keep a body-limit failure as 413; every other multipart failure is a bad request.
fn multipart_error(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}

#[async_trait]
impl<S> FromRequest<S> for PointForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text()))?;

        let mut form = PointForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }
            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e.status(), e.body_text()))?;
                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.image = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e.status(), e.body_text()))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_stays_payload_too_large() {
        assert!(matches!(
            multipart_error(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into()),
            AppError::PayloadTooLarge(_)
        ));
        assert!(matches!(
            multipart_error(StatusCode::BAD_REQUEST, "missing boundary".into()),
            AppError::BadRequest(_)
        ));
    }
}
