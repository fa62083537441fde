//! Homepage setting types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use craft_bazaar_core::{SettingId, SettingType};

use super::{FieldErrors, Payload};

/// A key/value homepage setting such as `hero_title` or `hero_image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: SettingId,
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: SettingType,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a setting.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSetting {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: SettingType,
    #[serde(default)]
    pub description: Option<String>,
}

impl Payload for NewSetting {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::collect(self.validate());
        if self.kind == SettingType::Boolean && !matches!(self.value.as_str(), "true" | "false") {
            errors.push("value", "must be \"true\" or \"false\" for boolean settings");
        }
        errors.into_result()
    }
}

/// Payload for `PUT /settings/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingValue {
    pub value: String,
}

impl Payload for SettingValue {
    fn check(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_setting_defaults_to_text() {
        let new: NewSetting =
            serde_json::from_str(r#"{"key":"hero_title","value":"Made by hand"}"#).unwrap();
        assert_eq!(new.kind, SettingType::Text);
        assert!(new.check().is_ok());
    }

    #[test]
    fn test_boolean_setting_value_checked() {
        let new: NewSetting =
            serde_json::from_str(r#"{"key":"show_banner","value":"yes","type":"boolean"}"#)
                .unwrap();
        assert!(new.check().unwrap_err().get("value").is_some());
    }

    #[test]
    fn test_setting_value_must_be_string() {
        assert!(serde_json::from_str::<SettingValue>(r#"{"value":3}"#).is_err());
    }
}
