//! Authentication service.
//!
//! Accounts log in with email and password (argon2id hashes). A successful
//! login or registration opens a session identified by an opaque bearer
//! token; the same token store serves customers and admins.

mod error;

pub use error::AuthError;

use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use moka::future::Cache;
use rand::RngCore;

use craft_bazaar_core::{Email, UserId, UserRole};

use crate::db::users::UserRepository;
use crate::db::{Database, RepositoryError};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Upper bound on concurrently live sessions.
const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store mapping bearer tokens to user ids.
///
/// Entries expire after the configured time-to-live. Sessions do not
/// survive a restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, UserId>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("entries", &self.sessions.entry_count())
            .finish()
    }
}

impl SessionStore {
    /// Create a store whose sessions live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Open a session for `user_id` and return its token.
    pub async fn create(&self, user_id: UserId) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.sessions.insert(token.clone(), user_id).await;
        token
    }

    /// The user a live token belongs to.
    pub async fn get(&self, token: &str) -> Option<UserId> {
        self.sessions.get(token).await
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) {
        self.sessions.invalidate(token).await;
    }
}

/// Authentication service.
///
/// Handles registration, login, logout and token lookup.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    sessions: &'a SessionStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(db: &'a Database, sessions: &'a SessionStore) -> Self {
        Self {
            users: UserRepository::new(db),
            sessions,
        }
    }

    /// Register a customer account and log it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[tracing::instrument(skip(self, name, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let user = self
            .create_account(name, email, password, UserRole::Customer)
            .await?;
        let token = self.sessions.create(user.id).await;
        tracing::info!(user = %user.id, "Account registered");
        Ok((user, token))
    }

    /// Create an account without opening a session.
    ///
    /// Used by the operator CLI to create admins.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::register`].
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(name, &email, password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self
            .users
            .get_by_email(&email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let token = self.sessions.create(user.id).await;
        Ok((user, token))
    }

    /// End the session behind `token`.
    pub async fn logout(&self, token: &str) {
        self.sessions.revoke(token).await;
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the token is unknown, expired,
    /// or belongs to an account that no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self
            .sessions
            .get(token)
            .await
            .ok_or(AuthError::InvalidSession)?;
        self.users.get(user_id).await.ok_or(AuthError::InvalidSession)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
