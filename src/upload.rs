//! Local storage for point images. Files are written under generated names and served back as `/uploads/{name}`.

use crate::error::AppError;
use std::path::{Path, PathBuf};

/// An image received in a multipart request.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// True for `image/*` content types, or a known image extension when no type was sent.
    pub fn is_image(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct.to_ascii_lowercase().starts_with("image/"),
            None => has_image_extension(&self.file_name),
        }
    }
}

fn has_image_extension(name: &str) -> bool {
    const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        UploadStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write bundled static files (e.g. item icons) that are not already present. Returns how many were written.
    pub async fn install(&self, files: &[(&str, &[u8])]) -> Result<usize, AppError> {
        let mut written = 0;
        for (name, bytes) in files {
            let path = self.dir.join(name);
            if tokio::fs::try_exists(&path).await? {
                continue;
            }
            tokio::fs::write(&path, bytes).await?;
            written += 1;
        }
        Ok(written)
    }

    /// Write the file under a fresh name and return that name.
    pub async fn save(&self, file: &UploadedFile) -> Result<String, AppError> {
        let filename = generate_filename(&file.file_name);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, &file.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = file.bytes.len(), "stored upload");
        Ok(filename)
    }

    /// Best effort: a failure is logged, not returned.
    pub async fn remove(&self, filename: &str) {
        let path = self.dir.join(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove upload");
        }
    }
}

/// `{12 random hex chars}-{sanitized original name}`.
pub fn generate_filename(original: &str) -> String {
    let hash = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", &hash[..12], sanitize_filename(original))
}

/// Longest stem kept from an uploaded name; keeps stored names well under filesystem limits.
pub const MAX_STEM_CHARS: usize = 100;
const MAX_EXTENSION_CHARS: usize = 16;

/// Keep the last path component, replace anything outside `[A-Za-z0-9._-]` with `_`,
/// and cut the stem to `MAX_STEM_CHARS`. The extension is kept.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "image".into();
    }
    // Only ASCII remains, so byte slicing is char-safe.
    match cleaned.rfind('.') {
        Some(dot) if cleaned.len() - dot - 1 <= MAX_EXTENSION_CHARS => {
            let (stem, ext) = cleaned.split_at(dot);
            format!("{}{}", &stem[..stem.len().min(MAX_STEM_CHARS)], ext)
        }
        _ => cleaned[..cleaned.len().min(MAX_STEM_CHARS)].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foto.png", "foto.png")]
    #[case("../../etc/passwd", "passwd")]
    #[case("C:\\fotos\\mercado central.jpg", "mercado_central.jpg")]
    #[case("ponto-çõ.jpg", "ponto-__.jpg")]
    #[case("", "image")]
    #[case("..", "image")]
    fn sanitizes_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }

    #[test]
    fn long_names_are_cut_keeping_the_extension() {
        let long = format!("{}.png", "a".repeat(250));
        let name = sanitize_filename(&long);
        assert_eq!(name, format!("{}.png", "a".repeat(MAX_STEM_CHARS)));

        let no_ext = "b".repeat(300);
        assert_eq!(sanitize_filename(&no_ext).len(), MAX_STEM_CHARS);

        assert!(generate_filename(&long).len() < 255);
    }

    #[tokio::test]
    async fn long_upload_names_can_be_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let file = UploadedFile {
            file_name: format!("{}.png", "a".repeat(250)),
            content_type: Some("image/png".into()),
            bytes: b"png-bytes".to_vec(),
        };
        let name = store.save(&file).await.unwrap();
        assert!(name.ends_with(".png"));
        assert!(store.dir().join(&name).exists());
    }

    #[tokio::test]
    async fn install_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        std::fs::write(dir.path().join("oleo.svg"), "custom").unwrap();
        let written = store
            .install(&[("oleo.svg", b"<svg/>"), ("lampadas.svg", b"<svg/>")])
            .await
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(dir.path().join("oleo.svg")).unwrap(), "custom");
        assert!(dir.path().join("lampadas.svg").exists());
    }

    #[test]
    fn generated_name_has_hex_prefix() {
        let name = generate_filename("foto.png");
        let (prefix, rest) = name.split_at(12);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(rest, "-foto.png");
        assert_ne!(generate_filename("foto.png"), name);
    }

    #[rstest]
    #[case(Some("image/png"), "x.bin", true)]
    #[case(Some("IMAGE/SVG+XML"), "x", true)]
    #[case(Some("application/pdf"), "x.png", false)]
    #[case(None, "x.JPG", true)]
    #[case(None, "x.txt", false)]
    fn detects_images(#[case] content_type: Option<&str>, #[case] name: &str, #[case] expected: bool) {
        let file = UploadedFile {
            file_name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes: vec![],
        };
        assert_eq!(file.is_image(), expected);
    }

    #[tokio::test]
    async fn saves_and_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));
        store.ensure_dir().await.unwrap();
        let file = UploadedFile {
            file_name: "foto.png".into(),
            content_type: Some("image/png".into()),
            bytes: b"png-bytes".to_vec(),
        };
        let name = store.save(&file).await.unwrap();
        let path = store.dir().join(&name);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");
        store.remove(&name).await;
        assert!(!path.exists());
    }
}
