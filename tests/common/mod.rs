#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use ecoleta::{AppConfig, AppState, UploadStore};
use serde_json::Value;
use sqlx::PgPool;
use std::path::Path;
use std::sync::Arc;

pub const BOUNDARY: &str = "ecoleta-test-boundary";

pub fn state_with_pool(pool: PgPool, upload_dir: &Path) -> AppState {
    let config = AppConfig {
        upload_dir: upload_dir.to_path_buf(),
        ..AppConfig::default()
    };
    AppState {
        pool,
        config: Arc::new(config),
        uploads: UploadStore::new(upload_dir),
    }
}

/// Valid text fields of a point submission.
pub fn point_fields(city: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Mercado do Zé".to_string()),
        ("email", "contato@mercado.com".to_string()),
        ("whatsapp", "27999999999".to_string()),
        ("latitude", "-20.3155".to_string()),
        ("longitude", "-40.3128".to_string()),
        ("city", city.to_string()),
        ("uf", "ES".to_string()),
        ("itens", "1,2".to_string()),
    ]
}

pub struct ImagePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub const PNG: ImagePart<'static> = ImagePart {
    file_name: "fachada.png",
    content_type: "image/png",
    bytes: b"\x89PNG\r\n\x1a\nfake",
};

pub fn multipart_body(fields: &[(&str, String)], image: Option<&ImagePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some(image) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, image.file_name, image.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(image.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn post_points(fields: &[(&str, String)], image: Option<&ImagePart<'_>>) -> Request<Body> {
    let body = multipart_body(fields, image);
    Request::builder()
        .method("POST")
        .uri("/points")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
