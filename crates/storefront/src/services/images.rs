//! Uploaded image storage.
//!
//! Images live under `<data_dir>/images/<kind>/<yyyy>/<mm>/<dd>/` and are
//! served statically at `/images/...`, so the public URL of a stored file is
//! its path relative to the images root.

use std::path::{Component, Path, PathBuf};

use chrono::{Datelike, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::fs;

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accepted MIME types.
pub const ALLOWED_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// URL prefix under which the images root is served.
pub const URL_PREFIX: &str = "/images/";

/// Errors that can occur while storing or deleting images.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Only image files (JPEG, PNG, WebP, GIF) are allowed")]
    UnsupportedType(String),

    #[error("Image exceeds the {max} byte limit")]
    TooLarge { max: usize },

    #[error("No image file uploaded")]
    Missing,

    #[error("Invalid image URL")]
    InvalidUrl,

    #[error("Image not found")]
    NotFound,

    #[error("image storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an upload belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Product,
    Category,
    /// Homepage hero banner.
    Homepage,
}

impl ImageKind {
    const fn directory(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Category => "categories",
            Self::Homepage => "homepage/hero",
        }
    }

    const fn file_prefix(self) -> &'static str {
        match self {
            Self::Homepage => "hero_banner_",
            Self::Product | Self::Category => "",
        }
    }
}

/// Metadata returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub image_url: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub mimetype: String,
}

/// Image files rooted at `<data_dir>/images`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write an uploaded image into today's bucket for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::UnsupportedType` for a non-image MIME type,
    /// `ImageError::TooLarge` past [`MAX_IMAGE_BYTES`], `ImageError::Missing`
    /// for an empty upload and `ImageError::Io` if the file cannot be written.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(
        &self,
        kind: ImageKind,
        original_name: &str,
        mimetype: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageError> {
        if !ALLOWED_TYPES.contains(&mimetype) {
            return Err(ImageError::UnsupportedType(mimetype.to_owned()));
        }
        if bytes.is_empty() {
            return Err(ImageError::Missing);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }

        let today = Utc::now();
        let relative_dir = format!(
            "{}/{:04}/{:02}/{:02}",
            kind.directory(),
            today.year(),
            today.month(),
            today.day()
        );
        fs::create_dir_all(self.root.join(&relative_dir)).await?;

        let filename = unique_filename(kind, original_name, mimetype, today.timestamp_millis());
        let relative = format!("{relative_dir}/{filename}");
        fs::write(self.root.join(&relative), bytes).await?;
        tracing::info!(path = %relative, "Stored uploaded image");

        Ok(StoredImage {
            image_url: format!("{URL_PREFIX}{relative}"),
            filename,
            original_name: original_name.to_owned(),
            size: bytes.len(),
            mimetype: mimetype.to_owned(),
        })
    }

    /// Delete the file behind an `/images/...` URL.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::InvalidUrl` for URLs outside the images root,
    /// `ImageError::NotFound` if no such file exists and `ImageError::Io` if
    /// it cannot be removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, image_url: &str) -> Result<(), ImageError> {
        let path = self.resolve(image_url)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ImageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Map an image URL to a file under the root, refusing anything that
    /// could escape it.
    fn resolve(&self, image_url: &str) -> Result<PathBuf, ImageError> {
        let relative = image_url
            .strip_prefix(URL_PREFIX)
            .ok_or(ImageError::InvalidUrl)?;
        let relative = Path::new(relative);
        let safe = !relative.as_os_str().is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe || image_url.contains("..") {
            return Err(ImageError::InvalidUrl);
        }
        Ok(self.root.join(relative))
    }
}

/// Replace anything outside `[A-Za-z0-9.-]` with `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn extension(original_name: &str, mimetype: &str) -> String {
    let from_name = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    from_name.map_or_else(
        || {
            match mimetype {
                "image/png" => "png",
                "image/webp" => "webp",
                "image/gif" => "gif",
                _ => "jpg",
            }
            .to_owned()
        },
        str::to_ascii_lowercase,
    )
}

/// Longest stem kept from an uploaded name. Keeps generated names well
/// under the usual 255-byte filename limit.
const MAX_STEM_LENGTH: usize = 100;

fn unique_filename(kind: ImageKind, original_name: &str, mimetype: &str, millis: i64) -> String {
    let sanitized = sanitize(original_name);
    let stem = sanitized.split('.').next().filter(|s| !s.is_empty()).unwrap_or("image");
    let stem = &stem[..stem.len().min(MAX_STEM_LENGTH)];
    let nonce: u32 = rand::rng().random_range(0..1_000_000_000);
    format!(
        "{}{stem}_{millis}-{nonce}.{}",
        kind.file_prefix(),
        extension(original_name, mimetype)
    )
}
