//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Highest star count shown for a product rating.
pub const MAX_STARS: u8 = 5;

/// A product as listed by `GET /api/product/list`.
///
/// Field names follow the backend documents (`_id`, `offerPrice`, `inStock`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend document ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Category label, e.g. `"Vegetables"`.
    #[serde(default)]
    pub category: String,
    /// List price.
    pub price: Price,
    /// Discounted price actually charged.
    pub offer_price: Price,
    /// Image URLs, the first one is the default thumbnail.
    #[serde(default, rename = "image")]
    pub images: Vec<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Description,
    /// Whether the product can currently be bought.
    #[serde(default)]
    pub in_stock: bool,
    /// Average rating, if any reviews exist.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Product {
    /// Number of filled stars for the rating, `round(rating)` clamped to `0..=5`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn star_count(&self) -> u8 {
        let rating = self.rating.unwrap_or(0.0);
        if rating.is_nan() {
            return 0;
        }
        rating.round().clamp(0.0, f64::from(MAX_STARS)) as u8
    }

    /// Route of the category listing this product belongs to.
    #[must_use]
    pub fn category_path(&self) -> String {
        format!("/products/{}", self.category.to_lowercase())
    }

    /// Default thumbnail image.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Product description, stored either as bullet lines or a single paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    /// One entry per bullet point.
    Lines(Vec<String>),
    /// A single paragraph.
    Text(String),
}

impl Default for Description {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl Description {
    /// Description as display lines.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Self::Text(text) => vec![text.as_str()],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product_json() -> serde_json::Value {
        json!({
            "_id": "p1",
            "name": "Fresh Apples",
            "category": "Fruits",
            "price": 12.5,
            "offerPrice": 9.99,
            "image": ["apple-1.png", "apple-2.png"],
            "description": ["Crisp", "Sweet"],
            "inStock": true,
            "rating": 3.6
        })
    }

    #[test]
    fn test_deserialize_backend_document() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.offer_price, Price::from_cents(999));
        assert_eq!(product.thumbnail(), Some("apple-1.png"));
        assert_eq!(product.description.lines(), vec!["Crisp", "Sweet"]);
        assert!(product.in_stock);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2",
            "name": "Bread",
            "price": 3,
            "offerPrice": 2.5
        }))
        .unwrap();
        assert!(product.images.is_empty());
        assert!(product.thumbnail().is_none());
        assert!(!product.in_stock);
        assert_eq!(product.star_count(), 0);
        assert!(product.description.lines().is_empty());
    }

    #[test]
    fn test_description_as_plain_text() {
        let mut value = product_json();
        value["description"] = json!("Just apples");
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.description.lines(), vec!["Just apples"]);
    }

    #[test]
    fn test_star_count_rounds_and_clamps() {
        let mut product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.star_count(), 4);
        product.rating = Some(4.4);
        assert_eq!(product.star_count(), 4);
        product.rating = Some(9.0);
        assert_eq!(product.star_count(), 5);
        product.rating = Some(-2.0);
        assert_eq!(product.star_count(), 0);
    }

    #[test]
    fn test_category_path_is_lowercase() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.category_path(), "/products/fruits");
    }
}
