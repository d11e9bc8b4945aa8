//! Cart and line item types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::{Currency, Money};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// The option values that tell two lines of the same product apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(Vec<String>);

impl VariantKey {
    /// A color/size key.
    pub fn new(color: impl Into<String>, size: impl Into<String>) -> Self {
        Self(vec![color.into(), size.into()])
    }

    /// A key from an arbitrary value tuple.
    pub fn from_values(values: Vec<String>) -> Self {
        Self(values)
    }

    /// The value tuple, in option order.
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// First option value.
    pub fn color(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Second option value.
    pub fn size(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" / "))
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID, when the line came from a resolved variant.
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Product name at time of adding.
    pub name: String,
    /// Unit price.
    pub unit_price: Money,
    /// Image shown next to the line.
    #[serde(default)]
    pub image: String,
    /// Option values identifying the variant.
    pub key: VariantKey,
    /// Quantity.
    pub quantity: i64,
}

impl CartItem {
    /// Check if this line has the given identity.
    pub fn matches(&self, product_id: &ProductId, key: &VariantKey) -> bool {
        &self.product_id == product_id && &self.key == key
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// A shopping cart.
///
/// Lines keep insertion order and no two lines share a product and key.
/// The total is recomputed on every mutation and cannot be set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: Currency,
    total: Money,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            total: Money::zero(currency),
        }
    }

    /// Rebuild a cart from stored lines.
    ///
    /// Lines that could not have been added (bad quantity, other currency,
    /// overflowing totals) are dropped; duplicate identities are merged.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>, currency: Currency) -> Self {
        let mut cart = Self::new(currency);
        for item in items {
            if let Err(e) = cart.add(item) {
                tracing::warn!(error = %e, "dropping stored cart line");
            }
        }
        cart
    }

    /// Add an item, merging quantities with an existing line of the same identity.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The merged quantity would exceed MAX_QUANTITY_PER_ITEM
    /// - The item is priced in another currency
    /// - Arithmetic overflow would occur
    pub fn add(&mut self, item: CartItem) -> Result<(), CommerceError> {
        if item.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }
        if item.unit_price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: item.unit_price.currency.code().to_string(),
            });
        }

        match self
            .items
            .iter()
            .position(|i| i.matches(&item.product_id, &item.key))
        {
            Some(index) => {
                let existing = &self.items[index];
                let quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CommerceError::Overflow)?;
                check_limit(quantity)?;
                self.total = self.total_with(&existing.unit_price, item.quantity)?;
                self.items[index].quantity = quantity;
            }
            None => {
                check_limit(item.quantity)?;
                self.total = self.total_with(&item.unit_price, item.quantity)?;
                self.items.push(item);
            }
        }
        Ok(())
    }

    /// Remove the line with this identity. Returns whether one was removed.
    pub fn remove(&mut self, product_id: &ProductId, key: &VariantKey) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, key));
        let removed = self.items.len() < len_before;
        if removed {
            // Removing lines can only shrink a total that already fit.
            self.total = self.compute_total(&self.items).unwrap_or(self.total);
        }
        removed
    }

    /// Overwrite a line's quantity.
    ///
    /// A quantity of zero or less removes the line. Returns whether a line
    /// was changed or removed.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        key: &VariantKey,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id, key));
        }
        check_limit(quantity)?;

        let Some(index) = self.items.iter().position(|i| i.matches(product_id, key)) else {
            return Ok(false);
        };
        let line = &self.items[index];
        self.total = self.total_with(&line.unit_price, quantity - line.quantity)?;
        self.items[index].quantity = quantity;
        Ok(true)
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::zero(self.currency);
    }

    /// Sum of unit price times quantity over all lines.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Find a line by identity.
    pub fn get(&self, product_id: &ProductId, key: &VariantKey) -> Option<&CartItem> {
        self.items.iter().find(|i| i.matches(product_id, key))
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The total after changing one line by `quantity_delta` units of `unit_price`.
    fn total_with(&self, unit_price: &Money, quantity_delta: i64) -> Result<Money, CommerceError> {
        unit_price
            .try_multiply(quantity_delta)
            .and_then(|delta| self.total.try_add(&delta))
            .ok_or(CommerceError::Overflow)
    }

    fn compute_total(&self, items: &[CartItem]) -> Result<Money, CommerceError> {
        let line_totals = items
            .iter()
            .map(CartItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(line_totals.iter(), self.currency).ok_or(CommerceError::Overflow)
    }
}

fn check_limit(quantity: i64) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::item;
    use super::*;

    fn expected_total(cart: &Cart) -> i64 {
        cart.items()
            .iter()
            .map(|i| i.unit_price.amount_cents * i.quantity)
            .sum()
    }

    #[test]
    fn test_add_same_identity_merges_quantities() {
        let mut cart = Cart::new(Currency::BRL);
        cart.add(item("Blue", "M", 12990, 2)).unwrap();
        cart.add(item("Blue", "M", 12990, 3)).unwrap();

        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total().amount_cents, 64950);
    }

    #[test]
    fn test_add_different_size_appends() {
        let mut cart = Cart::new(Currency::BRL);
        cart.add(item("Blue", "M", 12990, 1)).unwrap();
        cart.add(item("Blue", "S", 12990, 1)).unwrap();
        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.items()[1].key.size(), Some("S"));
    }

    #[test]
    fn test_add_rejects_bad_quantity() {
        let mut cart = Cart::new(Currency::BRL);
        assert!(matches!(
            cart.add(item("Blue", "M", 12990, 0)),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.add(item("Blue", "M", 12990, MAX_QUANTITY_PER_ITEM + 1)),
            Err(CommerceError::QuantityExceedsLimit(_, _))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_over_limit_leaves_cart_untouched() {
        let mut cart = Cart::new(Currency::BRL);
        cart.add(item("Blue", "M", 100, MAX_QUANTITY_PER_ITEM)).unwrap();
        assert!(cart.add(item("Blue", "M", 100, 1)).is_err());
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_overflowing_total_leaves_cart_untouched() {
        let mut cart = Cart::new(Currency::BRL);
        let huge = i64::MAX / 4;
        cart.add(item("Blue", "M", huge, 1)).unwrap();

        assert!(matches!(
            cart.add(item("Black", "S", huge, 4)),
            Err(CommerceError::Overflow)
        ));
        let blue = VariantKey::new("Blue", "M");
        assert!(matches!(
            cart.set_quantity(&ProductId::new(1), &blue, 8),
            Err(CommerceError::Overflow)
        ));
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.total().amount_cents, huge);
    }

    #[test]
    fn test_add_rejects_other_currency() {
        let mut cart = Cart::new(Currency::BRL);
        let mut usd = item("Blue", "M", 1000, 1);
        usd.unit_price = Money::new(1000, Currency::USD);
        assert!(matches!(
            cart.add(usd),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new(Currency::BRL);
        cart.add(item("Blue", "M", 12990, 2)).unwrap();
        cart.add(item("Black", "S", 12990, 1)).unwrap();

        let key = VariantKey::new("Blue", "M");
        assert!(cart.set_quantity(&ProductId::new(1), &key, 0).unwrap());
        assert_eq!(cart.unique_item_count(), 1);
        assert!(cart.get(&ProductId::new(1), &key).is_none());
        assert_eq!(cart.total().amount_cents, 12990);
    }

    #[test]
    fn test_set_quantity_missing_line_is_noop() {
        let mut cart = Cart::new(Currency::BRL);
        cart.add(item("Blue", "M", 12990, 2)).unwrap();
        let changed = cart
            .set_quantity(&ProductId::new(2), &VariantKey::new("Blue", "M"), 4)
            .unwrap();
        assert!(!changed);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new(Currency::BRL);
        cart.add(item("Blue", "M", 12990, 2)).unwrap();
        assert!(!cart.remove(&ProductId::new(1), &VariantKey::new("Blue", "XL")));
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = Cart::new(Currency::BRL);
        let blue = VariantKey::new("Blue", "M");
        let product = ProductId::new(1);

        cart.add(item("Blue", "M", 12990, 1)).unwrap();
        assert_eq!(cart.total().amount_cents, expected_total(&cart));
        cart.add(item("Black", "S", 13990, 2)).unwrap();
        assert_eq!(cart.total().amount_cents, expected_total(&cart));
        cart.set_quantity(&product, &blue, 4).unwrap();
        assert_eq!(cart.total().amount_cents, expected_total(&cart));
        cart.remove(&product, &VariantKey::new("Black", "S"));
        assert_eq!(cart.total().amount_cents, expected_total(&cart));
        assert_eq!(cart.total().amount_cents, 4 * 12990);
        cart.clear();
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_from_items_sanitizes() {
        let cart = Cart::from_items(
            vec![
                item("Blue", "M", 12990, 1),
                item("Blue", "M", 12990, 2),
                item("Black", "S", 12990, -1),
            ],
            Currency::BRL,
        );
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_variant_key_serializes_as_array() {
        let json = serde_json::to_string(&VariantKey::new("Blue", "M")).unwrap();
        assert_eq!(json, r#"["Blue","M"]"#);
        assert_eq!(VariantKey::new("Blue", "M").to_string(), "Blue / M");
    }
}
