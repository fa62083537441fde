//! Homepage settings repository.

use chrono::Utc;

use craft_bazaar_core::{SettingId, SettingType};

use super::document::take;
use super::{Database, RepositoryError};
use crate::models::{NewSetting, Setting};

/// Rejection message for a boolean setting given anything but `true`/`false`.
const BOOLEAN_VALUE_MESSAGE: &str = "must be \"true\" or \"false\" for boolean settings";

/// Repository for key/value homepage settings.
pub struct SettingRepository<'a> {
    db: &'a Database,
}

impl<'a> SettingRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Vec<Setting> {
        self.db.read(|doc| doc.settings.clone()).await
    }

    pub async fn get(&self, key: &str) -> Option<Setting> {
        self.db
            .read(|doc| doc.settings.iter().find(|s| s.key == key).cloned())
            .await
    }

    /// Create a setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the key already exists.
    #[tracing::instrument(skip(self, new), fields(key = %new.key))]
    pub async fn create(&self, new: NewSetting) -> Result<Setting, RepositoryError> {
        self.db
            .write(|doc| {
                if doc.settings.iter().any(|s| s.key == new.key) {
                    return Err(RepositoryError::Conflict(format!(
                        "Setting with key '{}' already exists",
                        new.key
                    )));
                }
                let now = Utc::now();
                let setting = Setting {
                    id: SettingId::new(take(&mut doc.counters.setting_id)?),
                    key: new.key,
                    value: new.value,
                    kind: new.kind,
                    description: new.description,
                    created_at: now,
                    updated_at: now,
                };
                doc.settings.push(setting.clone());
                Ok(setting)
            })
            .await
    }

    /// Replace a setting's value and bump its `updatedAt`.
    ///
    /// Returns `None` if the key does not exist. Boolean settings only take
    /// `"true"` or `"false"`; the type is checked under the same write lock
    /// as the update.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] for a non-boolean value on a
    /// boolean setting, or a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self, value))]
    pub async fn update(&self, key: &str, value: String) -> Result<Option<Setting>, RepositoryError> {
        self.db
            .write_opt(|doc| {
                let Some(setting) = doc.settings.iter_mut().find(|s| s.key == key) else {
                    return Ok(None);
                };
                if setting.kind == SettingType::Boolean && !matches!(value.as_str(), "true" | "false")
                {
                    return Err(RepositoryError::Invalid(BOOLEAN_VALUE_MESSAGE.to_string()));
                }
                setting.value = value;
                setting.updated_at = Utc::now();
                Ok(Some(setting.clone()))
            })
            .await
    }

    /// Delete a setting. Returns `false` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
        let deleted = self
            .db
            .write_opt(|doc| {
                let before = doc.settings.len();
                doc.settings.retain(|s| s.key != key);
                Ok((doc.settings.len() < before).then_some(()))
            })
            .await?;
        Ok(deleted.is_some())
    }
}
