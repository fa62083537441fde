//! "Related products" ranking.
//!
//! Candidates earn points for sharing the reference product's category,
//! overlapping feature tags, sitting in a similar price band, and two small
//! bonuses (featured, in stock). Scores are only used for ordering.

use rust_decimal::Decimal;

use crate::models::Product;

/// Maximum number of recommendations returned.
pub const LIMIT: usize = 8;

const SAME_CATEGORY: f64 = 50.0;
const FEATURE_WEIGHT: f64 = 30.0;
const CLOSE_PRICE: f64 = 10.0;
const NEAR_PRICE: f64 = 5.0;
const FEATURED: f64 = 5.0;
const IN_STOCK: f64 = 3.0;

/// Fraction of the larger feature list matched by the reference's features.
///
/// A reference feature matches when it contains, or is contained by, any
/// candidate feature, ignoring case.
#[allow(clippy::cast_precision_loss)]
fn feature_overlap(reference: &[String], candidate: &[String]) -> f64 {
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let candidate: Vec<String> = candidate.iter().map(|f| f.to_lowercase()).collect();
    let matched = reference
        .iter()
        .map(|f| f.to_lowercase())
        .filter(|f| candidate.iter().any(|c| c.contains(f.as_str()) || f.contains(c.as_str())))
        .count();
    let larger = reference.len().max(candidate.len());
    matched as f64 / larger as f64
}

fn price_points(reference: &Product, candidate: &Product) -> f64 {
    match reference.price.relative_difference(&candidate.price) {
        Some(diff) if diff <= Decimal::new(2, 1) => CLOSE_PRICE,
        Some(diff) if diff <= Decimal::new(5, 1) => NEAR_PRICE,
        _ => 0.0,
    }
}

/// Similarity of `candidate` to `reference`.
#[must_use]
pub fn score(reference: &Product, candidate: &Product) -> f64 {
    let mut score = 0.0;
    if candidate.category_id == reference.category_id {
        score += SAME_CATEGORY;
    }
    score += FEATURE_WEIGHT * feature_overlap(&reference.features, &candidate.features);
    score += price_points(reference, candidate);
    if candidate.featured {
        score += FEATURED;
    }
    if candidate.in_stock() {
        score += IN_STOCK;
    }
    score
}

/// Rank `products` against `reference`, best first.
///
/// The reference itself is skipped. Equal scores keep their input order.
/// At most [`LIMIT`] products are returned.
#[must_use]
pub fn recommend(reference: &Product, products: &[Product]) -> Vec<Product> {
    let mut scored: Vec<(f64, &Product)> = products
        .iter()
        .filter(|p| p.id != reference.id)
        .map(|p| (score(reference, p), p))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(LIMIT)
        .map(|(_, p)| p.clone())
        .collect()
}
