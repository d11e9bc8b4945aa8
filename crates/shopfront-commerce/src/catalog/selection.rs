//! In-progress variant choice on a product page.

use serde::{Deserialize, Serialize};

use crate::cart::{CartItem, VariantKey};
use crate::catalog::{Product, ProductVariant};
use crate::checkout::{Address, ShippingEstimate};
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};

/// Storage key of the page snapshot for `product_id`.
pub fn selection_key(product_id: ProductId) -> String {
    shopfront_cache::cache_key!("selection", product_id)
}

/// Chosen value per option, `None` while unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<Option<String>>);

impl Selection {
    /// An empty selection for `option_count` options.
    pub fn new(option_count: usize) -> Self {
        Self(vec![None; option_count])
    }

    /// Chosen value at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|v| v.as_deref())
    }

    /// Number of option slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no option slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if every option has a value.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// The full value tuple, once complete.
    pub fn values(&self) -> Option<Vec<&str>> {
        self.0.iter().map(|v| v.as_deref()).collect()
    }

    fn set(&mut self, index: usize, value: Option<String>) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }

    fn resize(&mut self, option_count: usize) {
        self.0.resize(option_count, None);
    }
}

/// Presentation policy for the selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Changing the first option clears the other choices and the picked image.
    pub reset_on_primary_change: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            reset_on_primary_change: true,
        }
    }
}

/// Persisted page state for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// Chosen option values.
    #[serde(default)]
    pub selected: Selection,
    /// Gallery image the shopper picked.
    #[serde(default)]
    pub main_image: Option<String>,
    /// Formatted postal-code input.
    #[serde(default)]
    pub postal_code: String,
    /// Last address found for the postal code.
    #[serde(default)]
    pub address: Option<Address>,
}

impl SelectionSnapshot {
    /// Shipping-estimate state as it was saved.
    pub fn shipping(&self) -> ShippingEstimate {
        ShippingEstimate::restore(&self.postal_code, self.address.clone())
    }

    /// Copy the shipping-estimate state into the snapshot.
    pub fn set_shipping(&mut self, estimate: &ShippingEstimate) {
        self.postal_code = estimate.input().to_string();
        self.address = estimate.address().cloned();
    }
}

/// Resolves a shopper's option choices against a product's variants.
///
/// # Example
///
/// ```rust,ignore
/// let mut selector = VariantSelector::new(product);
/// selector.select_option(0, "Blue")?;
/// selector.select_option(1, "M")?;
/// if selector.can_add_to_cart() {
///     cart.add(selector.line_item(1)?)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VariantSelector {
    product: Product,
    selection: Selection,
    matched: Option<VariantId>,
    main_image: Option<String>,
    policy: SelectionPolicy,
}

impl VariantSelector {
    /// Start an empty selection for `product`.
    pub fn new(product: Product) -> Self {
        let selection = Selection::new(product.option_count());
        Self {
            product,
            selection,
            matched: None,
            main_image: None,
            policy: SelectionPolicy::default(),
        }
    }

    /// Rehydrate from a persisted snapshot.
    ///
    /// Slots beyond the product's current option list are dropped and missing
    /// ones are left unset.
    pub fn restore(product: Product, snapshot: &SelectionSnapshot) -> Self {
        let mut selector = Self::new(product);
        selector.selection = snapshot.selected.clone();
        selector.selection.resize(selector.product.option_count());
        selector.main_image = snapshot.main_image.clone();
        selector.resolve();
        selector
    }

    /// Use a different presentation policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The product being configured.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Current choices.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Set option `index` to `value` and re-resolve.
    ///
    /// Other options keep their values unless this changes the first option
    /// under a resetting policy.
    pub fn select_option(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<Option<&ProductVariant>, CommerceError> {
        let count = self.product.option_count();
        if index >= count {
            return Err(CommerceError::InvalidOption { index, count });
        }

        let value = value.into();
        let primary_changed = index == 0 && self.selection.get(0) != Some(value.as_str());
        if primary_changed && self.policy.reset_on_primary_change {
            self.selection = Selection::new(count);
            self.main_image = None;
        }
        self.selection.set(index, Some(value));
        self.resolve();
        Ok(self.resolved())
    }

    /// The variant matching the full selection, if any.
    pub fn resolved(&self) -> Option<&ProductVariant> {
        self.matched.and_then(|id| self.product.variant(id))
    }

    /// Values for option `index` that some variant offers together with the
    /// choices made at lower indices.
    pub fn available_values(&self, index: usize) -> Vec<&str> {
        self.product
            .option_values(index)
            .into_iter()
            .filter(|value| {
                self.product.variants.iter().any(|variant| {
                    variant.values.get(index).map(String::as_str) == Some(*value)
                        && (0..index).all(|i| match self.selection.get(i) {
                            Some(chosen) => variant.values.get(i).map(String::as_str) == Some(chosen),
                            None => true,
                        })
                })
            })
            .collect()
    }

    /// Check if the selection resolves to a variant with stock.
    pub fn can_add_to_cart(&self) -> bool {
        self.resolved().is_some_and(ProductVariant::is_in_stock)
    }

    /// Pick the displayed image.
    pub fn set_main_image(&mut self, url: impl Into<String>) {
        self.main_image = Some(url.into());
    }

    /// The image to display: the picked one, then the variant's, then the product's.
    pub fn display_image(&self) -> Option<&str> {
        self.main_image
            .as_deref()
            .or_else(|| self.resolved().and_then(|v| v.image_url.as_deref()))
            .or_else(|| self.product.representative_image())
    }

    /// Build the cart line for the resolved variant.
    pub fn line_item(&self, quantity: i64) -> Result<CartItem, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let variant = self.resolved().ok_or(CommerceError::VariantNotResolved)?;
        if !variant.is_in_stock() {
            return Err(CommerceError::OutOfStock(variant.build_name()));
        }

        Ok(CartItem {
            product_id: self.product.id,
            variant_id: Some(variant.id),
            name: self.product.title.clone(),
            unit_price: variant.unit_price(self.product.currency)?,
            image: self.display_image().unwrap_or_default().to_string(),
            key: VariantKey::from_values(variant.values.clone()),
            quantity,
        })
    }

    /// Selection part of the page snapshot.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected: self.selection.clone(),
            main_image: self.main_image.clone(),
            ..SelectionSnapshot::default()
        }
    }

    fn resolve(&mut self) {
        self.matched = self
            .selection
            .values()
            .and_then(|values| self.product.find_variant(&values))
            .map(|variant| variant.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::tee;

    #[test]
    fn test_selection_key() {
        assert_eq!(selection_key(ProductId::new(42)), "selection:42");
    }

    #[test]
    fn test_partial_selection_resolves_nothing() {
        let mut selector = VariantSelector::new(tee());
        assert!(selector.select_option(0, "Blue").unwrap().is_none());
        assert!(!selector.selection().is_complete());
        assert!(!selector.can_add_to_cart());
    }

    #[test]
    fn test_full_selection_resolves_exact_variant() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Blue").unwrap();
        let variant = selector.select_option(1, "M").unwrap().unwrap();
        assert_eq!(variant.id, VariantId::new(13));
        assert_eq!(variant.inventory_quantity, 5);
        assert!(selector.can_add_to_cart());
    }

    #[test]
    fn test_unmatched_combination_disables_checkout() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Blue").unwrap();
        assert!(selector.select_option(1, "XL").unwrap().is_none());
        assert!(!selector.can_add_to_cart());
        assert!(matches!(
            selector.line_item(1),
            Err(CommerceError::VariantNotResolved)
        ));
    }

    #[test]
    fn test_zero_stock_blocks_add() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Black").unwrap();
        selector.select_option(1, "XL").unwrap();
        assert!(selector.resolved().is_some());
        assert!(!selector.can_add_to_cart());
        assert!(matches!(selector.line_item(1), Err(CommerceError::OutOfStock(_))));
    }

    #[test]
    fn test_out_of_range_option() {
        let mut selector = VariantSelector::new(tee());
        let err = selector.select_option(2, "Cotton").unwrap_err();
        assert!(matches!(err, CommerceError::InvalidOption { index: 2, count: 2 }));
    }

    #[test]
    fn test_changing_primary_resets_dependents() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Blue").unwrap();
        selector.select_option(1, "M").unwrap();
        selector.set_main_image("tee-back.png");

        selector.select_option(0, "Black").unwrap();
        assert_eq!(selector.selection().get(1), None);
        assert!(selector.resolved().is_none());
        assert_eq!(selector.display_image(), Some("tee.png"));
    }

    #[test]
    fn test_reselecting_same_primary_keeps_dependents() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Blue").unwrap();
        selector.select_option(1, "M").unwrap();
        selector.select_option(0, "Blue").unwrap();
        assert_eq!(selector.selection().get(1), Some("M"));
        assert!(selector.resolved().is_some());
    }

    #[test]
    fn test_non_resetting_policy_keeps_other_options() {
        let mut selector = VariantSelector::new(tee()).with_policy(SelectionPolicy {
            reset_on_primary_change: false,
        });
        selector.select_option(1, "S").unwrap();
        let variant = selector.select_option(0, "Black").unwrap().unwrap();
        assert_eq!(variant.id, VariantId::new(11));
    }

    #[test]
    fn test_available_values_follow_primary_choice() {
        let mut selector = VariantSelector::new(tee());
        assert_eq!(selector.available_values(1), vec!["S", "M", "XL"]);
        selector.select_option(0, "Black").unwrap();
        assert_eq!(selector.available_values(1), vec!["S", "XL"]);
        selector.select_option(0, "Blue").unwrap();
        assert_eq!(selector.available_values(1), vec!["M"]);
    }

    #[test]
    fn test_line_item_uses_variant_data() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Blue").unwrap();
        selector.select_option(1, "M").unwrap();

        let item = selector.line_item(2).unwrap();
        assert_eq!(item.variant_id, Some(VariantId::new(13)));
        assert_eq!(item.key, VariantKey::new("Blue", "M"));
        assert_eq!(item.unit_price.amount_cents, 12990);
        assert_eq!(item.image, "blue.png");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_restore_from_snapshot() {
        let mut selector = VariantSelector::new(tee());
        selector.select_option(0, "Blue").unwrap();
        selector.select_option(1, "M").unwrap();
        let json = serde_json::to_string(&selector.snapshot()).unwrap();

        let snapshot: SelectionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = VariantSelector::restore(tee(), &snapshot);
        assert_eq!(restored.resolved().unwrap().id, VariantId::new(13));
    }

    #[test]
    fn test_snapshot_carries_shipping_state() {
        let mut snapshot = SelectionSnapshot::default();
        let mut estimate = ShippingEstimate::new();
        estimate.on_input("0131");
        snapshot.set_shipping(&estimate);
        assert_eq!(snapshot.postal_code, "0131");
        assert_eq!(snapshot.shipping().input(), "0131");
        assert!(snapshot.shipping().address().is_none());
    }

    #[test]
    fn test_restore_with_stale_shape() {
        let snapshot = SelectionSnapshot {
            selected: serde_json::from_str(r#"["Blue", "M", "Cotton"]"#).unwrap(),
            ..SelectionSnapshot::default()
        };
        let restored = VariantSelector::restore(tee(), &snapshot);
        assert_eq!(restored.selection().len(), 2);
        assert!(restored.resolved().is_some());
    }
}
