//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! cb-cli admin create -n "Shop Owner" -e owner@example.com -p 'a long password'
//! ```
//!
//! # Environment Variables
//!
//! - `CB_ADMIN_PASSWORD` - Password used when `-p` is not given
//! - `STOREFRONT_DATA_DIR` - Data directory when `--data-dir` is not given

use std::path::Path;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use craft_bazaar_core::{UserId, UserRole};
use craft_bazaar_storefront::db::{Database, RepositoryError};
use craft_bazaar_storefront::services::auth::{AuthError, AuthService, SessionStore};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The store could not be opened.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Account creation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create an admin account in the store under `data_dir`.
///
/// A missing store is seeded first, like the server does on startup.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create_admin(
    data_dir: &Path,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<UserId, AdminError> {
    let db = Database::open(data_dir).await?;
    // Sessions are not used; the service needs a store to exist
    let sessions = SessionStore::new(Duration::from_secs(60));

    tracing::info!("Creating admin user: {}", email);

    let user = AuthService::new(&db, &sessions)
        .create_account(name, email, password.expose_secret(), UserRole::Admin)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use craft_bazaar_core::Email;
    use craft_bazaar_storefront::db::users::UserRepository;

    #[tokio::test]
    async fn test_create_admin() {
        let dir = tempfile::tempdir().unwrap();
        let password = SecretString::from("correct horse battery");

        let id = create_admin(dir.path(), "Owner", "owner@example.com", &password)
            .await
            .unwrap();

        let db = Database::open(dir.path()).await.unwrap();
        let user = UserRepository::new(&db)
            .get_by_email(&Email::parse("OWNER@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_and_short_password() {
        let dir = tempfile::tempdir().unwrap();
        let password = SecretString::from("correct horse battery");
        create_admin(dir.path(), "Owner", "owner@example.com", &password)
            .await
            .unwrap();

        let err = create_admin(dir.path(), "Other", "owner@example.com", &password)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Auth(AuthError::UserAlreadyExists)));

        let err = create_admin(
            dir.path(),
            "Other",
            "other@example.com",
            &SecretString::from("short"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AdminError::Auth(AuthError::WeakPassword(_))));
    }
}
