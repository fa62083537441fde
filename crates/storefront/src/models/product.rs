//! Product types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use craft_bazaar_core::{CategoryId, Price, ProductId};

use super::{Category, FieldErrors, Payload};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub category_id: CategoryId,
    #[serde(default)]
    pub stock: i32,
    /// Ordered image URLs; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    pub sku: String,
    #[serde(default)]
    pub featured: bool,
    /// Free-text feature tags used for recommendations.
    #[serde(default)]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product joined with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub description: String,
    pub price: Price,
    pub category_id: CategoryId,
    #[serde(default)]
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub sku: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Payload for NewProduct {
    fn check(&self) -> Result<(), FieldErrors> {
        FieldErrors::collect(self.validate()).into_result()
    }
}

impl NewProduct {
    /// Build the stored record.
    #[must_use]
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
            stock: self.stock,
            images: self.images,
            sku: self.sku,
            featured: self.featured,
            features: self.features,
            created_at,
        }
    }
}

/// Partial update of a product. Array fields replace the stored arrays
/// wholesale when supplied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category_id: Option<CategoryId>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub sku: Option<String>,
    pub featured: Option<bool>,
    pub features: Option<Vec<String>>,
}

impl Payload for ProductUpdate {
    fn check(&self) -> Result<(), FieldErrors> {
        FieldErrors::collect(self.validate()).into_result()
    }
}

impl ProductUpdate {
    /// Apply the supplied fields to `product`.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(sku) = self.sku {
            product.sku = sku;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(features) = self.features {
            product.features = features;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        NewProduct {
            name: "Vase".to_owned(),
            description: "Blue vase".to_owned(),
            price: "1200".parse().unwrap(),
            category_id: CategoryId::new(1),
            stock: 4,
            images: vec!["/images/a.jpg".to_owned()],
            sku: "VASE-1".to_owned(),
            featured: false,
            features: vec!["Handmade".to_owned()],
        }
        .into_product(ProductId::new(9), Utc::now())
    }

    #[test]
    fn test_new_product_accepts_numeric_price() {
        let json = r#"{"name":"Bowl","description":"Clay bowl","price":450,
            "categoryId":1,"sku":"BOWL-1"}"#;
        let new: NewProduct = serde_json::from_str(json).unwrap();
        assert!(new.check().is_ok());
        assert_eq!(new.price.to_string(), "450");
        assert_eq!(new.stock, 0);
        assert!(new.images.is_empty());
    }

    #[test]
    fn test_new_product_rejects_negative_stock() {
        let json = r#"{"name":"Bowl","description":"Clay bowl","price":"450",
            "categoryId":1,"sku":"BOWL-1","stock":-2}"#;
        let new: NewProduct = serde_json::from_str(json).unwrap();
        let errors = new.check().unwrap_err();
        assert_eq!(errors.get("stock").unwrap(), ["cannot be negative"]);
    }

    #[test]
    fn test_update_replaces_arrays() {
        let mut product = sample();
        let update: ProductUpdate =
            serde_json::from_str(r#"{"images":[],"stock":0}"#).unwrap();
        update.apply(&mut product);
        assert!(product.images.is_empty());
        assert_eq!(product.stock, 0);
        assert_eq!(product.features, ["Handmade"]);
        assert!(!product.in_stock());
    }

    #[test]
    fn test_with_category_flattens() {
        let joined = ProductWithCategory {
            product: sample(),
            category: Category {
                id: CategoryId::new(1),
                name: "Pottery".to_owned(),
                slug: "pottery".to_owned(),
                description: None,
                thumbnail: None,
            },
        };
        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["sku"], "VASE-1");
        assert_eq!(value["categoryId"], 1);
        assert_eq!(value["category"]["slug"], "pottery");
        assert_eq!(value["price"], "1200");
    }
}
