//! Product page state shared by the product, cart and shipping commands.

use anyhow::{Context as _, Result};
use shopfront_commerce::catalog::{ProductSource, SelectionSlot, VariantSelector};
use shopfront_commerce::checkout::ShippingEstimate;

use crate::context::{Context, Shop, Store};

/// The fetched product plus the shopper's saved choices for it.
pub struct ProductPage {
    /// Variant choice.
    pub selector: VariantSelector,
    /// Postal code entry and found address.
    pub shipping: ShippingEstimate,
    slot: SelectionSlot<Store>,
}

impl ProductPage {
    /// Fetch the product and restore any fresh snapshot for it.
    pub async fn open(ctx: &Context, shop: &Shop) -> Result<Self> {
        let source = ctx.product_source()?;
        let spinner = ctx.output.spinner("Loading product...");
        let product = source.fetch_product().await;
        spinner.finish_and_clear();
        let product = product.context("Failed to load product")?;

        let slot = ctx.selection_slot(shop, product.id);
        let policy = ctx.config.selection_policy();
        let (selector, shipping) = match slot.load() {
            Some(snapshot) => {
                ctx.output.debug(&format!("Restored selection from {}", slot.key()));
                (
                    VariantSelector::restore(product, &snapshot).with_policy(policy),
                    snapshot.shipping(),
                )
            }
            None => (
                VariantSelector::new(product).with_policy(policy),
                ShippingEstimate::new(),
            ),
        };

        Ok(Self {
            selector,
            shipping,
            slot,
        })
    }

    /// Persist the current choices.
    pub fn save(&self) -> Result<()> {
        let mut snapshot = self.selector.snapshot();
        snapshot.set_shipping(&self.shipping);
        self.slot
            .save(&snapshot)
            .context("Failed to save product selection")
    }

    /// Forget the saved choices.
    pub fn discard(&self) -> Result<()> {
        self.slot
            .clear()
            .context("Failed to discard product selection")
    }
}
