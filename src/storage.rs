//! Local files: the template image that goes upstream with every prompt, and
//! the generated images that come back.

use std::path::{Component, Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use rand::RngExt;
use rand::distr::Alphanumeric;
use tracing::{debug, info};

use crate::constants::{
    GENERATED_DIR_NAME, GENERATED_TOKEN_LENGTH, GENERATED_URL_PREFIX, PLACEHOLDER_PNG_BASE64,
};

/// Joins a caller-supplied path onto the content root.
///
/// A leading `/` (or drive prefix) is dropped so absolute paths land under the
/// root too. `..` segments are not sanitized.
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    let relative: PathBuf = Path::new(relative)
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
        .collect();
    root.join(relative)
}

/// Writes the placeholder PNG at `path` if nothing is there yet, creating
/// parent directories as needed. Returns true when it wrote one.
pub async fn ensure_template(path: &Path) -> std::io::Result<bool> {
    if tokio::fs::try_exists(path).await? {
        return Ok(false);
    }

    info!("Template image not found at {}, writing placeholder", path.display());
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, placeholder_png()?).await?;
    Ok(true)
}

/// The 1x1 transparent PNG used in place of a missing template
pub fn placeholder_png() -> std::io::Result<Vec<u8>> {
    STANDARD
        .decode(PLACEHOLDER_PNG_BASE64)
        .map_err(std::io::Error::other)
}

/// Reads a file and base64-encodes it.
pub async fn read_base64(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(STANDARD.encode(bytes))
}

/// Failures writing a generated image
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The service sent something that isn't base64
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),
    /// The filesystem said no
    #[error("Failed to write generated image: {0}")]
    Io(#[from] std::io::Error),
}

/// An image that's been written to disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedImage {
    /// Where it landed on disk
    pub path: PathBuf,
    /// Where the browser can fetch it, eg `/generated/generated-1-abc.png`
    pub public_path: String,
}

/// Writes generated images into `<public dir>/generated/`.
#[derive(Clone, Debug)]
pub struct GeneratedImageStore {
    dir: PathBuf,
}

impl GeneratedImageStore {
    /// Store rooted at the public dir, images go in its `generated` child.
    pub fn new(public_dir: &Path) -> Self {
        Self {
            dir: public_dir.join(GENERATED_DIR_NAME),
        }
    }

    /// Directory images are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decodes `data` and writes it under a fresh name.
    ///
    /// Decoding happens before anything touches the disk, so bad data never
    /// leaves a file behind.
    pub async fn save(&self, data: &str, mime_type: &str) -> Result<SavedImage, SaveError> {
        let bytes = STANDARD.decode(data.trim())?;
        let filename = generated_filename(extension_for(mime_type, &bytes));

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());

        Ok(SavedImage {
            path,
            public_path: format!("{}/{}", GENERATED_URL_PREFIX, filename),
        })
    }
}

/// `generated-<unix millis>-<random token>.<ext>`
fn generated_filename(extension: &str) -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_TOKEN_LENGTH)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!(
        "generated-{}-{}.{}",
        Utc::now().timestamp_millis(),
        token,
        extension
    )
}

/// File extension for an image, from its MIME type or failing that its bytes.
fn extension_for(mime_type: &str, bytes: &[u8]) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => image::guess_format(bytes)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("png"),
    }
}
