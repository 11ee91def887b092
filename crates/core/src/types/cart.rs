//! Cart contents: product ID to quantity.
//!
//! [`CartItems`] is immutable from the outside. Every mutation returns a new
//! value, so holders of an older snapshot never observe a change and
//! equality comparisons between snapshots stay meaningful.
//!
//! A key is only ever present with a quantity of at least one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Mapping of product ID to a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CartItems(BTreeMap<ProductId, u32>);

impl CartItems {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Quantity of a product, if it is in the cart.
    #[must_use]
    pub fn quantity(&self, id: &str) -> Option<u32> {
        self.0.get(id).copied()
    }

    /// Whether the product is in the cart.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(product, quantity)` pairs in product ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.0.iter().map(|(id, qty)| (id, *qty))
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.0.values().map(|&qty| u64::from(qty)).sum()
    }

    /// A copy with one more unit of `id`, creating the entry at 1.
    #[must_use]
    pub fn with_added(&self, id: &ProductId) -> Self {
        let mut next = self.0.clone();
        let qty = next.entry(id.clone()).or_insert(0);
        *qty = qty.saturating_add(1);
        Self(next)
    }

    /// A copy with the quantity of `id` set exactly.
    ///
    /// A quantity of zero removes the entry.
    #[must_use]
    pub fn with_quantity(&self, id: &ProductId, quantity: u32) -> Self {
        let mut next = self.0.clone();
        if quantity == 0 {
            next.remove(id.as_str());
        } else {
            next.insert(id.clone(), quantity);
        }
        Self(next)
    }

    /// A copy with one unit of `id` taken out, deleting the entry when it
    /// reaches zero. Returns `None` when `id` is not in the cart.
    #[must_use]
    pub fn with_removed(&self, id: &str) -> Option<Self> {
        let current = self.quantity(id)?;
        let mut next = self.0.clone();
        if current <= 1 {
            next.remove(id);
        } else {
            next.insert(ProductId::new(id), current - 1);
        }
        Some(Self(next))
    }

    /// Total price, `sum(quantity * unit price)` truncated to whole cents.
    ///
    /// `unit_price` returns `None` for products it does not know; those
    /// entries contribute nothing.
    #[must_use]
    pub fn total<F>(&self, unit_price: F) -> Price
    where
        F: Fn(&ProductId) -> Option<Price>,
    {
        self.iter()
            .filter_map(|(id, qty)| unit_price(id).map(|price| price.times(qty)))
            .sum::<Price>()
            .floor_cents()
    }
}

impl<'de> Deserialize<'de> for CartItems {
    /// Entries with a non-positive quantity are dropped, so a stored cart
    /// can never break the positive-quantity invariant.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<ProductId, i64>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl FromIterator<(ProductId, i64)> for CartItems {
    fn from_iter<I: IntoIterator<Item = (ProductId, i64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter_map(|(id, qty)| u32::try_from(qty).ok().filter(|&q| q > 0).map(|q| (id, q)))
                .collect(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn cart(entries: &[(&str, i64)]) -> CartItems {
        entries.iter().map(|(k, v)| (id(k), *v)).collect()
    }

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap())
    }

    fn catalog(id: &ProductId) -> Option<Price> {
        match id.as_str() {
            "p1" => Some(price("9.99")),
            "p2" => Some(price("0.333")),
            _ => None,
        }
    }

    #[test]
    fn test_with_added_creates_then_increments() {
        let empty = CartItems::new();
        let once = empty.with_added(&id("p1"));
        let twice = once.with_added(&id("p1"));

        assert!(empty.is_empty());
        assert_eq!(once, cart(&[("p1", 1)]));
        assert_eq!(twice, cart(&[("p1", 2)]));
    }

    #[test]
    fn test_with_quantity_sets_exactly() {
        let updated = cart(&[("p1", 2)]).with_quantity(&id("p1"), 5);
        assert_eq!(updated, cart(&[("p1", 5)]));

        let created = CartItems::new().with_quantity(&id("p3"), 4);
        assert_eq!(created.quantity("p3"), Some(4));
    }

    #[test]
    fn test_with_quantity_zero_removes_entry() {
        let updated = cart(&[("p1", 2), ("p2", 1)]).with_quantity(&id("p1"), 0);
        assert_eq!(updated, cart(&[("p2", 1)]));
        assert!(!updated.contains("p1"));
    }

    #[test]
    fn test_with_removed_deletes_at_zero() {
        let removed = cart(&[("p1", 1)]).with_removed("p1").unwrap();
        assert!(removed.is_empty());

        let decremented = cart(&[("p1", 3)]).with_removed("p1").unwrap();
        assert_eq!(decremented, cart(&[("p1", 2)]));
    }

    #[test]
    fn test_with_removed_missing_is_none() {
        assert!(cart(&[("p1", 1)]).with_removed("p9").is_none());
    }

    #[test]
    fn test_add_then_remove_restores_exact_mapping() {
        for start in [CartItems::new(), cart(&[("p1", 2)]), cart(&[("p2", 1)])] {
            let restored = start.with_added(&id("p1")).with_removed("p1").unwrap();
            assert_eq!(restored, start);
        }
    }

    #[test]
    fn test_no_non_positive_quantities_after_mixed_mutations() {
        let mut items = CartItems::new();
        let ops: [(&str, u8, u32); 8] = [
            ("p1", 0, 0),
            ("p1", 2, 0),
            ("p2", 1, 3),
            ("p2", 2, 0),
            ("p2", 2, 0),
            ("p2", 1, 0),
            ("p3", 2, 0),
            ("p1", 0, 0),
        ];
        for (product, op, qty) in ops {
            items = match op {
                0 => items.with_added(&id(product)),
                1 => items.with_quantity(&id(product), qty),
                _ => items.with_removed(product).unwrap_or(items),
            };
            assert!(items.iter().all(|(_, q)| q > 0));
        }
        assert_eq!(items, cart(&[("p1", 1)]));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let items = cart(&[("p1", 2), ("p2", 3)]);
        assert_eq!(items.item_count(), 5);
        assert_eq!(items.item_count(), items.item_count());
    }

    #[test]
    fn test_total_multiplies_and_truncates() {
        assert_eq!(cart(&[("p1", 1)]).total(catalog), price("9.99"));
        assert_eq!(cart(&[("p1", 5)]).total(catalog), price("49.95"));
        // 3 * 0.333 = 0.999, floored to 0.99
        assert_eq!(cart(&[("p2", 3)]).total(catalog), price("0.99"));
    }

    #[test]
    fn test_total_ignores_unknown_products() {
        let items = cart(&[("p1", 1), ("ghost", 7)]);
        assert_eq!(items.total(catalog), price("9.99"));
        assert_eq!(cart(&[("ghost", 7)]).total(catalog), Price::ZERO);
    }

    #[test]
    fn test_deserialize_drops_non_positive_quantities() {
        let items: CartItems = serde_json::from_value(json!({"p1": 2, "p2": 0, "p3": -1})).unwrap();
        assert_eq!(items, cart(&[("p1", 2)]));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let value = serde_json::to_value(cart(&[("p1", 2), ("p2", 1)])).unwrap();
        assert_eq!(value, json!({"p1": 2, "p2": 1}));
    }
}
