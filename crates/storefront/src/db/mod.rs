//! JSON file store and repositories.
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   database.json          whole store document, rewritten on every change
//!   images/<kind>/yyyy/mm/dd/...   uploaded images
//! ```
//!
//! The document is read once at startup and held in memory behind a
//! [`tokio::sync::RwLock`]. Reads share the lock and never touch disk. Every
//! mutation takes the write guard, applies its change to a copy of the
//! document, persists the copy (temp file + rename) and only then publishes
//! it, so a failed write leaves the in-memory state untouched and concurrent
//! mutations cannot overwrite each other.
//!
//! Repositories borrow the [`Database`] the way the rest of the crate expects:
//!
//! ```rust,ignore
//! let product = ProductRepository::new(&state.db).get(id).await;
//! ```

pub mod cart;
pub mod categories;
pub mod document;
pub mod integrity;
pub mod orders;
pub mod products;
pub mod seed;
pub mod settings;
pub mod users;
pub mod wishlist;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tokio::sync::RwLock;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use document::{Counters, RepairReport, StoreDocument};
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use settings::SettingRepository;
pub use users::UserRepository;
pub use wishlist::WishlistRepository;

/// Errors that can occur in the store and its repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Reading or writing the store file failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A uniqueness rule would be broken (duplicate sku, slug, key, email).
    #[error("{0}")]
    Conflict(String),

    /// The entity is still referenced and cannot be deleted.
    #[error("{0}")]
    ReferenceInUse(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    MissingReference(String),

    /// A value cannot be stored as given.
    #[error("{0}")]
    Invalid(String),
}

/// File name of the store document inside the data directory.
pub const STORE_FILE: &str = "database.json";
/// Directory holding uploaded images inside the data directory.
pub const IMAGES_DIR: &str = "images";

/// Handle to the in-memory store document and its backing file.
///
/// Cheap to clone; all clones share the same document.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    data_dir: PathBuf,
    path: PathBuf,
    state: RwLock<StoreDocument>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Load the store from `data_dir`, seeding it if needed.
    ///
    /// A missing file is replaced by the seed catalog. A file that cannot be
    /// parsed is moved aside to `database.json.corrupt-<unix-ts>` and the
    /// store is reseeded. Loaded documents are repaired (counters raised,
    /// missing tracking numbers assigned) and written back if anything
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the data directory cannot be
    /// created or the store file cannot be read or written.
    #[tracing::instrument(skip_all, fields(data_dir = %data_dir.as_ref().display()))]
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(data_dir.join(IMAGES_DIR)).await?;
        let path = data_dir.join(STORE_FILE);

        let (mut doc, mut dirty) = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<StoreDocument>(&bytes) {
                Ok(doc) => (doc, false),
                Err(e) => {
                    let aside = quarantine(&path).await?;
                    tracing::warn!(
                        error = %e,
                        moved_to = %aside.display(),
                        "Store file is unreadable, reseeding"
                    );
                    (seed::seed_document(Utc::now()), true)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No store file found, writing seed catalog");
                (seed::seed_document(Utc::now()), true)
            }
            Err(e) => return Err(e.into()),
        };

        let report = doc.repair(|order, doc| {
            orders::unique_tracking_number(doc, order.created_at.date_naive())
        });
        if !report.is_empty() {
            tracing::warn!(
                counters = ?report.counters_raised,
                tracking_numbers = report.tracking_numbers_assigned,
                "Repaired store document"
            );
            dirty = true;
        }

        let unrecognized = doc
            .orders
            .iter()
            .filter(|order| order.status.known().is_none())
            .count();
        if unrecognized > 0 {
            tracing::warn!(orders = unrecognized, "Orders with unrecognized status kept as written");
        }

        if dirty {
            save(&path, &doc).await?;
        }

        tracing::info!(
            products = doc.products.len(),
            orders = doc.orders.len(),
            "Store loaded"
        );
        Ok(Self::from_parts(data_dir, path, doc))
    }

    /// Write `doc` as the store in `data_dir`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the file cannot be written.
    pub async fn create(data_dir: impl AsRef<Path>, doc: StoreDocument) -> Result<Self, RepositoryError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(data_dir.join(IMAGES_DIR)).await?;
        let path = data_dir.join(STORE_FILE);
        save(&path, &doc).await?;
        Ok(Self::from_parts(data_dir, path, doc))
    }

    /// Whether a store file already exists in `data_dir`.
    pub async fn exists(data_dir: impl AsRef<Path>) -> bool {
        fs::try_exists(data_dir.as_ref().join(STORE_FILE))
            .await
            .unwrap_or(false)
    }

    fn from_parts(data_dir: PathBuf, path: PathBuf, doc: StoreDocument) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                data_dir,
                path,
                state: RwLock::new(doc),
            }),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.inner.data_dir.join(IMAGES_DIR)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Run `f` against the current document under the shared lock.
    pub async fn read<T>(&self, f: impl FnOnce(&StoreDocument) -> T) -> T {
        let guard = self.inner.state.read().await;
        f(&guard)
    }

    /// A copy of the whole document.
    pub async fn snapshot(&self) -> StoreDocument {
        self.read(StoreDocument::clone).await
    }

    /// Apply a mutation and persist it.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a storage error if the document
    /// cannot be saved. In both cases the in-memory document is unchanged.
    pub async fn write<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        self.write_if(|doc| f(doc).map(|value| (value, true))).await
    }

    /// Apply a mutation that may find nothing to change.
    ///
    /// When `f` returns `Ok(None)` nothing is written.
    ///
    /// # Errors
    ///
    /// Same as [`Database::write`].
    pub async fn write_opt<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<Option<T>, RepositoryError>,
    ) -> Result<Option<T>, RepositoryError> {
        self.write_if(|doc| {
            f(doc).map(|value| {
                let changed = value.is_some();
                (value, changed)
            })
        })
        .await
    }

    /// Apply a mutation that reports whether it changed anything.
    ///
    /// `f` returns the value together with a changed flag; the document is
    /// only saved when the flag is set.
    ///
    /// # Errors
    ///
    /// Same as [`Database::write`].
    pub async fn write_if<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<(T, bool), RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self.inner.state.write().await;
        let mut draft = guard.clone();
        let (value, changed) = f(&mut draft)?;
        if !changed {
            return Ok(value);
        }
        if let Err(e) = save(&self.inner.path, &draft).await {
            tracing::error!(error = %e, path = %self.inner.path.display(), "Failed to save store");
            return Err(e);
        }
        *guard = draft;
        Ok(value)
    }

    /// Check that the store file is still present on disk.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the file cannot be inspected.
    pub async fn check_ready(&self) -> Result<(), RepositoryError> {
        let metadata = fs::metadata(&self.inner.path).await?;
        if metadata.is_file() {
            Ok(())
        } else {
            Err(std::io::Error::new(ErrorKind::InvalidData, "store path is not a file").into())
        }
    }
}

/// Serialize `doc` and atomically replace the file at `path`.
async fn save(path: &Path, doc: &StoreDocument) -> Result<(), RepositoryError> {
    let json = serde_json::to_vec_pretty(doc)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

/// Move an unreadable store file out of the way, returning its new path.
async fn quarantine(path: &Path) -> Result<PathBuf, RepositoryError> {
    let aside = PathBuf::from(format!("{}.corrupt-{}", path.display(), Utc::now().timestamp()));
    fs::rename(path, &aside).await?;
    Ok(aside)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_seeds_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        assert!(dir.path().join(STORE_FILE).is_file());
        assert!(dir.path().join(IMAGES_DIR).is_dir());
        let (categories, products) = db.read(|d| (d.categories.len(), d.products.len())).await;
        assert_eq!((categories, products), (5, 6));
        db.check_ready().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_quarantines_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), b"{ not json").unwrap();

        let db = Database::open(dir.path()).await.unwrap();
        assert_eq!(db.read(|d| d.products.len()).await, 6);

        let moved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("database.json.corrupt-"))
            .collect();
        assert_eq!(moved.len(), 1);
        assert_eq!(std::fs::read(moved[0].path()).unwrap(), b"{ not json");
    }

    #[tokio::test]
    async fn test_open_keeps_orders_with_unrecognized_status() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = r#"{
            "categories": [{"id": 1, "name": "Mine", "slug": "mine", "description": null, "thumbnail": null}],
            "products": [],
            "cartItems": [],
            "orders": [{"id": 1, "customerName": "A B", "customerEmail": "a@b.c",
                "shippingAddress": "x", "total": "10", "status": "processing", "items": "[]",
                "trackingNumber": "CB250301ABCDEF", "createdAt": "2025-03-01T10:00:00Z"}],
            "settings": [],
            "counters": {"categoryId": 2, "productId": 1, "cartItemId": 1, "orderId": 2}
        }"#;
        std::fs::write(dir.path().join(STORE_FILE), legacy).unwrap();

        let db = Database::open(dir.path()).await.unwrap();
        let (names, statuses) = db
            .read(|d| {
                (
                    d.categories.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
                    d.orders.iter().map(|o| o.status.to_string()).collect::<Vec<_>>(),
                )
            })
            .await;
        assert_eq!(names, ["Mine"]);
        assert_eq!(statuses, ["processing"]);
    }

    #[tokio::test]
    async fn test_round_trip_reproduces_document() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        db.write(|doc| {
            doc.counters.cart_item_id = 42;
            Ok(())
        })
        .await
        .unwrap();
        let before = db.snapshot().await;

        let reopened = Database::open(dir.path()).await.unwrap();
        assert_eq!(reopened.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let before = db.snapshot().await;

        let result: Result<(), _> = db
            .write(|doc| {
                doc.products.clear();
                Err(RepositoryError::Conflict("nope".to_owned()))
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(db.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let before = db.snapshot().await;
        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(dir.path().join("database.json.tmp")).unwrap();

        let result = db
            .write(|doc| {
                doc.products.clear();
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::Storage(_))));
        assert_eq!(db.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_write_opt_none_skips_save() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        std::fs::remove_file(dir.path().join(STORE_FILE)).unwrap();

        let result: Option<()> = db.write_opt(|_| Ok(None)).await.unwrap();
        assert!(result.is_none());
        assert!(!Database::exists(dir.path()).await);
    }
}
