//! User account repository.
//!
//! Emails are unique ignoring case; the stored value keeps the casing the
//! user registered with.

use chrono::Utc;

use craft_bazaar_core::{Email, UserId, UserRole};

use super::document::take;
use super::{Database, RepositoryError};
use crate::models::User;

/// Repository for user accounts.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: UserId) -> Option<User> {
        self.db
            .read(|doc| doc.users.iter().find(|u| u.id == id).cloned())
            .await
    }

    /// Find the account registered with `email`, ignoring case.
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        let wanted = email.normalized();
        self.db
            .read(|doc| {
                doc.users
                    .iter()
                    .find(|u| u.email.to_lowercase() == wanted)
                    .cloned()
            })
            .await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already
    /// registered.
    #[tracing::instrument(skip(self, name, email, password_hash), fields(email = %email))]
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: String,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let wanted = email.normalized();
        self.db
            .write(|doc| {
                if doc.users.iter().any(|u| u.email.to_lowercase() == wanted) {
                    return Err(RepositoryError::Conflict(
                        "An account with this email already exists".to_owned(),
                    ));
                }
                let user = User {
                    id: UserId::new(take(&mut doc.counters.user_id)?),
                    name: name.trim().to_owned(),
                    email: email.as_str().to_owned(),
                    password_hash,
                    role,
                    created_at: Utc::now(),
                };
                doc.users.push(user.clone());
                Ok(user)
            })
            .await
    }
}
