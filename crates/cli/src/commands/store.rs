//! Store file maintenance commands.
//!
//! # Usage
//!
//! ```bash
//! cb-cli store seed [--force]
//! cb-cli store stats
//! cb-cli store check
//! ```

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use craft_bazaar_storefront::db::document::StoreDocument;
use craft_bazaar_storefront::db::seed::seed_document;
use craft_bazaar_storefront::db::{Database, RepositoryError, STORE_FILE, integrity};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Seeding would overwrite existing data.
    #[error("A store already exists in {0}; pass --force to overwrite it")]
    AlreadyExists(String),

    /// There is no store file to inspect.
    #[error("No store found in {0}")]
    Missing(String),

    /// Reading or writing the store failed.
    #[error("Store error: {0}")]
    Repository(#[from] RepositoryError),

    /// The store file could not be read.
    #[error("Failed to read store file: {0}")]
    Io(#[from] std::io::Error),

    /// The store file is not a valid store document.
    #[error("Store file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The integrity check failed.
    #[error("{0} integrity issue(s) found")]
    IssuesFound(usize),
}

/// Write the seed catalog to `data_dir`.
pub async fn seed(data_dir: &Path, force: bool) -> Result<(), StoreError> {
    if Database::exists(data_dir).await && !force {
        return Err(StoreError::AlreadyExists(data_dir.display().to_string()));
    }

    let db = Database::create(data_dir, seed_document(Utc::now())).await?;
    let counts = db.read(StoreDocument::counts).await;

    tracing::info!(
        "Seeded {} with {} categories and {} products",
        db.path().display(),
        counts.get("categories").copied().unwrap_or_default(),
        counts.get("products").copied().unwrap_or_default()
    );
    Ok(())
}

/// Log entity counts and id counters.
pub async fn stats(data_dir: &Path) -> Result<(), StoreError> {
    let doc = load_raw(data_dir).await?;

    for (collection, count) in doc.counts() {
        tracing::info!("{collection:>12}: {count}");
    }
    tracing::info!("counters: {}", serde_json::to_string(&doc.counters)?);
    Ok(())
}

/// Report integrity issues; fails when there are any.
///
/// Reads the file as written, without the repairs the server applies on
/// startup, so stale counters show up too.
pub async fn check(data_dir: &Path) -> Result<(), StoreError> {
    let issues = inspect(data_dir).await?;

    if issues.is_empty() {
        tracing::info!("No integrity issues found");
        return Ok(());
    }
    for issue in &issues {
        tracing::warn!("{issue}");
    }
    Err(StoreError::IssuesFound(issues.len()))
}

async fn inspect(data_dir: &Path) -> Result<Vec<integrity::Issue>, StoreError> {
    let doc = load_raw(data_dir).await?;
    Ok(integrity::check(&doc))
}

async fn load_raw(data_dir: &Path) -> Result<StoreDocument, StoreError> {
    if !Database::exists(data_dir).await {
        return Err(StoreError::Missing(data_dir.display().to_string()));
    }
    let bytes = tokio::fs::read(data_dir.join(STORE_FILE)).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
