//! Initial catalog written when no store file exists.

use chrono::{DateTime, Utc};

use craft_bazaar_core::{CategoryId, Price};

use super::document::StoreDocument;
use crate::models::{Category, NewProduct};

const CATEGORIES: [(&str, &str, &str); 5] = [
    ("Pottery", "pottery", "Traditional ceramic arts and pottery items"),
    ("Textiles", "textiles", "Handwoven fabrics and textile crafts"),
    ("Jewelry", "jewelry", "Traditional and contemporary handmade jewelry"),
    ("Woodwork", "woodwork", "Carved wooden crafts and furniture"),
    ("Metalwork", "metalwork", "Brass, copper and other metal crafts"),
];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    category: i32,
    sku: &'static str,
    featured: bool,
    stock: i32,
    images: &'static [&'static str],
    features: &'static [&'static str],
}

const PRODUCTS: [SeedProduct; 6] = [
    SeedProduct {
        name: "Traditional Ceramic Vase",
        description: "Handcrafted ceramic vase with traditional Indian motifs. Perfect for home decoration.",
        price: 2999,
        category: 1,
        sku: "POT001",
        featured: true,
        stock: 15,
        images: &["/images/ceramic-vase-1.svg"],
        features: &["Handcrafted", "Traditional motifs", "Home decoration"],
    },
    SeedProduct {
        name: "Handwoven Silk Scarf",
        description: "Beautiful silk scarf with intricate handwoven patterns. Made by skilled artisans.",
        price: 1899,
        category: 2,
        sku: "TEX001",
        featured: true,
        stock: 25,
        images: &["/images/silk-scarf-1.svg"],
        features: &["Handwoven", "Silk material", "Intricate patterns"],
    },
    SeedProduct {
        name: "Silver Filigree Earrings",
        description: "Exquisite silver filigree earrings showcasing traditional craftsmanship.",
        price: 3499,
        category: 3,
        sku: "JEW001",
        featured: false,
        stock: 12,
        images: &["/images/silver-earrings-1.svg"],
        features: &["Silver filigree", "Traditional craftsmanship", "Lightweight"],
    },
    SeedProduct {
        name: "Carved Wooden Box",
        description: "Intricately carved wooden jewelry box with traditional designs.",
        price: 1599,
        category: 4,
        sku: "WOD001",
        featured: false,
        stock: 8,
        images: &["/images/wooden-box-1.jpg", "/images/wooden-box-2.jpg"],
        features: &["Hand-carved", "Traditional designs", "Jewelry storage"],
    },
    SeedProduct {
        name: "Embroidered Cushion Cover",
        description: "Hand-embroidered cushion cover with vibrant colors and traditional patterns.",
        price: 899,
        category: 2,
        sku: "TEX002",
        featured: true,
        stock: 30,
        images: &["/images/cushion-cover-1.jpg"],
        features: &["Hand-embroidered", "Vibrant colors", "Traditional patterns"],
    },
    SeedProduct {
        name: "Brass Decorative Plate",
        description: "Ornate brass plate with etched designs, perfect for wall decoration.",
        price: 2199,
        category: 5,
        sku: "MET001",
        featured: false,
        stock: 10,
        images: &["/images/brass-plate-1.jpg", "/images/brass-plate-2.jpg"],
        features: &["Brass material", "Etched designs", "Wall decoration"],
    },
];

/// Build the seed document: five categories and six products.
#[must_use]
pub fn seed_document(now: DateTime<Utc>) -> StoreDocument {
    let mut doc = StoreDocument::default();

    let mut next_category = 1;
    for (name, slug, description) in CATEGORIES {
        let id = CategoryId::new(next_category);
        next_category += 1;
        doc.categories.push(Category {
            id,
            name: name.to_owned(),
            slug: slug.to_owned(),
            description: Some(description.to_owned()),
            thumbnail: None,
        });
    }

    doc.counters.category_id = next_category;

    let mut next_product = 1;
    for seed in &PRODUCTS {
        let id = next_product.into();
        next_product += 1;
        let product = NewProduct {
            name: seed.name.to_owned(),
            description: seed.description.to_owned(),
            price: Price::new(seed.price.into()).unwrap_or(Price::ZERO),
            category_id: CategoryId::new(seed.category),
            stock: seed.stock,
            images: seed.images.iter().map(|s| (*s).to_owned()).collect(),
            sku: seed.sku.to_owned(),
            featured: seed.featured,
            features: seed.features.iter().map(|s| (*s).to_owned()).collect(),
        };
        doc.products.push(product.into_product(id, now));
    }
    doc.counters.product_id = next_product;

    doc
}
