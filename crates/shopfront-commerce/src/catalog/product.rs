//! Product and variant types.

use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product document as served by the catalog source.
///
/// Options are positional: `options[i]` names the option, `values[i]` lists
/// its allowed values and every variant's `values[i]` picks one of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description, if the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Option names, e.g. `["Color", "Size"]`.
    #[serde(default)]
    pub options: Vec<String>,
    /// Allowed values per option.
    #[serde(default)]
    pub values: Vec<Vec<String>>,
    /// Purchasable combinations.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Representative image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Image gallery.
    #[serde(default)]
    pub images: Vec<String>,
    /// Currency the variant prices are expressed in.
    #[serde(default)]
    pub currency: Currency,
}

impl Product {
    /// Number of options a full selection needs.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Name of option `index`, falling back to its position.
    pub fn option_name(&self, index: usize) -> String {
        self.options
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Option {}", index + 1))
    }

    /// Find an option's position by name (case-insensitive).
    pub fn option_index(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(name.trim()))
    }

    /// Allowed values for option `index`.
    ///
    /// When the document omits the per-option list, values are collected from
    /// the variants in first-seen order.
    pub fn option_values(&self, index: usize) -> Vec<&str> {
        if let Some(values) = self.values.get(index).filter(|v| !v.is_empty()) {
            return values.iter().map(String::as_str).collect();
        }
        let mut seen: Vec<&str> = Vec::new();
        for value in self.variants.iter().filter_map(|v| v.values.get(index)) {
            if !seen.contains(&value.as_str()) {
                seen.push(value);
            }
        }
        seen
    }

    /// The variant whose value tuple equals `values` exactly.
    pub fn find_variant<V: AsRef<str>>(&self, values: &[V]) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| {
            v.values.len() == values.len()
                && v.values.iter().zip(values).all(|(a, b)| a == b.as_ref())
        })
    }

    /// Look up a variant by id.
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Images to choose the main image from.
    pub fn gallery(&self) -> Vec<&str> {
        if self.images.is_empty() {
            self.image_url.iter().map(String::as_str).collect()
        } else {
            self.images.iter().map(String::as_str).collect()
        }
    }

    /// Image shown before any variant is chosen.
    pub fn representative_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }

    /// Check if any variant can be bought.
    pub fn is_available(&self) -> bool {
        self.variants.iter().any(ProductVariant::is_in_stock)
    }
}

/// A product variant (e.g., a color/size combination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// Catalog identifier.
    pub id: VariantId,
    /// Parent product ID.
    pub product_id: ProductId,
    /// One value per product option, in option order.
    pub values: Vec<String>,
    /// Unit price in whole currency units; the source sends it as a string.
    pub price: Decimal,
    /// Remaining stock.
    #[serde(default, alias = "stock")]
    pub inventory_quantity: i64,
    /// Variant image.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductVariant {
    /// Check if this variant is in stock.
    pub fn is_in_stock(&self) -> bool {
        self.inventory_quantity > 0
    }

    /// Price as money in `currency`.
    pub fn unit_price(&self, currency: Currency) -> Result<Money, CommerceError> {
        Money::from_decimal(self.price, currency)
    }

    /// Build the variant name from its values.
    pub fn build_name(&self) -> String {
        if self.values.is_empty() {
            "Default".to_string()
        } else {
            self.values.join(" / ")
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A two-option tee with a gap in the size grid.
    pub fn tee() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Pima Cotton Tee",
            "options": ["Color", "Size"],
            "values": [["Black", "Blue"], ["S", "M", "XL"]],
            "variants": [
                { "id": 11, "product_id": 1, "values": ["Black", "S"], "price": "129.90", "inventory_quantity": 3, "image_url": "black.png" },
                { "id": 12, "product_id": 1, "values": ["Black", "XL"], "price": "139.90", "inventory_quantity": 0, "image_url": "black.png" },
                { "id": 13, "product_id": 1, "values": ["Blue", "M"], "price": "129.90", "inventory_quantity": 5, "image_url": "blue.png" }
            ],
            "image_url": "tee.png",
            "images": ["tee.png", "tee-back.png"]
        }))
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::tee;
    use super::*;

    #[test]
    fn test_product_deserializes_string_prices() {
        let product = tee();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.variants.len(), 3);
        let price = product.variants[0].unit_price(Currency::BRL).unwrap();
        assert_eq!(price.amount_cents, 12990);
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id": 9, "title": "Mug", "extra": true,
                "variants": [{"id": 90, "product_id": 9, "values": [], "price": 25, "stock": 2}]}"#,
        )
        .unwrap();
        assert_eq!(product.option_count(), 0);
        assert!(product.images.is_empty());
        assert_eq!(product.variants[0].inventory_quantity, 2);
        assert!(product.find_variant::<&str>(&[]).is_some());
    }

    #[test]
    fn test_find_variant_exact_match_only() {
        let product = tee();
        assert_eq!(product.find_variant(&["Blue", "M"]).unwrap().id, VariantId::new(13));
        assert!(product.find_variant(&["Blue", "XL"]).is_none());
        assert!(product.find_variant(&["Blue"]).is_none());
    }

    #[test]
    fn test_variant_by_id() {
        let product = tee();
        assert_eq!(product.variant(VariantId::new(12)).unwrap().values, ["Black", "XL"]);
        assert!(product.variant(VariantId::new(99)).is_none());
    }

    #[test]
    fn test_option_values_fall_back_to_variants() {
        let mut product = tee();
        product.values.clear();
        assert_eq!(product.option_values(0), vec!["Black", "Blue"]);
        assert_eq!(product.option_values(1), vec!["S", "XL", "M"]);
    }

    #[test]
    fn test_option_index_by_name() {
        let product = tee();
        assert_eq!(product.option_index("size"), Some(1));
        assert_eq!(product.option_index("Material"), None);
    }

    #[test]
    fn test_variant_name_and_stock() {
        let product = tee();
        assert_eq!(product.variants[2].build_name(), "Blue / M");
        assert!(!product.variants[1].is_in_stock());
        assert!(product.is_available());
    }
}
