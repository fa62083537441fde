//! Category types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use craft_bazaar_core::{CategoryId, Slug};

use super::{FieldErrors, Payload, double_option};

/// A product category as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `/images/...` URL of the category tile.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Payload for creating a category.
///
/// When `slug` is omitted it is derived from the name.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl NewCategory {
    /// The slug to store: the supplied one, or one derived from the name.
    #[must_use]
    pub fn resolved_slug(&self) -> Option<Slug> {
        match &self.slug {
            Some(slug) => Slug::parse(slug).ok(),
            None => Slug::from_name(&self.name),
        }
    }
}

impl Payload for NewCategory {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::collect(self.validate());
        match &self.slug {
            Some(slug) => {
                if let Err(e) = Slug::parse(slug) {
                    errors.push("slug", e.to_string());
                }
            }
            None if Slug::from_name(&self.name).is_none() => {
                errors.push("slug", "is required when the name has no letters or digits");
            }
            None => {}
        }
        errors.into_result()
    }
}

/// Partial update of a category. Absent fields are left untouched;
/// `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail: Option<Option<String>>,
}

impl Payload for CategoryUpdate {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::collect(self.validate());
        if let Some(Err(e)) = self.slug.as_deref().map(Slug::parse) {
            errors.push("slug", e.to_string());
        }
        errors.into_result()
    }
}

impl CategoryUpdate {
    /// Apply the supplied fields to `category`.
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(thumbnail) = self.thumbnail {
            category.thumbnail = thumbnail;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_derives_slug() {
        let new: NewCategory = serde_json::from_str(r#"{"name":"Glass Art"}"#).unwrap();
        assert!(new.check().is_ok());
        assert_eq!(new.resolved_slug().unwrap().as_str(), "glass-art");
    }

    #[test]
    fn test_new_category_rejects_bad_slug() {
        let new: NewCategory =
            serde_json::from_str(r#"{"name":"Glass","slug":"Glass Art"}"#).unwrap();
        let errors = new.check().unwrap_err();
        assert!(errors.get("slug").is_some());
    }

    #[test]
    fn test_new_category_requires_name() {
        let new: NewCategory = serde_json::from_str(r#"{"name":"","slug":"x"}"#).unwrap();
        let errors = new.check().unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["must be 1-100 characters"]);
    }

    #[test]
    fn test_update_merges_supplied_fields() {
        let mut category = Category {
            id: CategoryId::new(1),
            name: "Pottery".to_owned(),
            slug: "pottery".to_owned(),
            description: Some("Clay".to_owned()),
            thumbnail: Some("/images/a.png".to_owned()),
        };
        let update: CategoryUpdate =
            serde_json::from_str(r#"{"name":"Ceramics","thumbnail":null}"#).unwrap();
        assert!(update.check().is_ok());
        update.apply(&mut category);
        assert_eq!(category.name, "Ceramics");
        assert_eq!(category.slug, "pottery");
        assert_eq!(category.description.as_deref(), Some("Clay"));
        assert_eq!(category.thumbnail, None);
    }
}
