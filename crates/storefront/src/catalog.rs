//! Read-side helpers over the catalog snapshot.
//!
//! These back the product listing, category and product detail pages. They
//! are pure functions of the snapshot and never touch the network.

use market_core::{Product, ProductId};

/// Maximum number of related products considered for a detail page.
pub const RELATED_LIMIT: usize = 5;

/// Look up a product by ID.
#[must_use]
pub fn find<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id.as_str() == id)
}

/// Products in a category, compared case-insensitively.
#[must_use]
pub fn in_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.category.eq_ignore_ascii_case(category))
        .collect()
}

/// In-stock products whose name contains `query`, ignoring case.
///
/// An empty or blank query matches every in-stock product.
#[must_use]
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| p.in_stock)
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Products shown under "Related Products" on a detail page.
///
/// Takes the first [`RELATED_LIMIT`] other products of the same category in
/// catalog order, then keeps the ones in stock. Out-of-stock neighbours are
/// not replaced, so fewer than five may be shown.
#[must_use]
pub fn related<'a>(products: &'a [Product], product: &Product) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(RELATED_LIMIT)
        .filter(|p| p.in_stock)
        .collect()
}

/// Everything the product detail page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub thumbnail: Option<String>,
    pub stars: u8,
    pub description: Vec<String>,
    pub category_path: String,
    pub related: Vec<Product>,
}

impl ProductDetail {
    /// Build the detail view for `id`, or `None` when the product is not in
    /// the snapshot ("Product not found").
    #[must_use]
    pub fn build(products: &[Product], id: &ProductId) -> Option<Self> {
        let product = find(products, id.as_str())?;

        Some(Self {
            thumbnail: product.thumbnail().map(str::to_owned),
            stars: product.star_count(),
            description: product
                .description
                .lines()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            category_path: product.category_path(),
            related: related(products, product).into_iter().cloned().collect(),
            product: product.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: &str, name: &str, category: &str, in_stock: bool) -> Product {
        serde_json::from_value(json!({
            "_id": id,
            "name": name,
            "category": category,
            "price": 5,
            "offerPrice": 4,
            "image": [format!("{id}.png")],
            "description": "Tasty",
            "inStock": in_stock,
            "rating": 4
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("a1", "Apple", "Fruits", true),
            product("v1", "Carrot", "Vegetables", true),
            product("a2", "Banana", "Fruits", false),
            product("a3", "Cherry", "Fruits", true),
            product("a4", "Date", "Fruits", true),
            product("a5", "Elderberry", "Fruits", true),
            product("a6", "Fig", "Fruits", true),
            product("a7", "Grape", "Fruits", true),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_find() {
        let products = catalog();
        assert_eq!(find(&products, "v1").unwrap().name, "Carrot");
        assert!(find(&products, "missing").is_none());
    }

    #[test]
    fn test_related_takes_five_then_filters_stock() {
        let products = catalog();
        let apple = find(&products, "a1").unwrap();
        // a2..a6 are the first five; a2 is out of stock and a7 does not move up
        assert_eq!(ids(&related(&products, apple)), ["a3", "a4", "a5", "a6"]);
    }

    #[test]
    fn test_related_excludes_self_and_other_categories() {
        let products = catalog();
        let carrot = find(&products, "v1").unwrap();
        assert!(related(&products, carrot).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_in_stock_only() {
        let products = catalog();
        assert_eq!(ids(&search(&products, "  APP ")), ["a1"]);
        assert!(search(&products, "banana").is_empty());
        assert_eq!(search(&products, "").len(), 7);
    }

    #[test]
    fn test_in_category() {
        let products = catalog();
        assert_eq!(ids(&in_category(&products, "vegetables")), ["v1"]);
        assert_eq!(in_category(&products, "FRUITS").len(), 7);
    }

    #[test]
    fn test_product_detail() {
        let products = catalog();
        let detail = ProductDetail::build(&products, &ProductId::new("a1")).unwrap();
        assert_eq!(detail.thumbnail.as_deref(), Some("a1.png"));
        assert_eq!(detail.stars, 4);
        assert_eq!(detail.description, ["Tasty"]);
        assert_eq!(detail.category_path, "/products/fruits");
        assert_eq!(detail.related.len(), 4);

        assert!(ProductDetail::build(&products, &ProductId::new("nope")).is_none());
    }
}
