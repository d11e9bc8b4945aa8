//! Storefront domain types and logic for shopfront.
//!
//! This crate holds everything a product page and cart need apart from I/O:
//!
//! - **Catalog**: products, variants and the in-progress variant selection
//! - **Cart**: line items, the durable cart store and its expiry sweep
//! - **Checkout**: postal-code lookup for shipping estimates, checkout payloads
//!
//! Product fetch, address lookup and checkout submission are traits
//! ([`ProductSource`](catalog::ProductSource),
//! [`AddressLookup`](checkout::AddressLookup),
//! [`CheckoutGateway`](checkout::CheckoutGateway)) implemented elsewhere.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_commerce::prelude::*;
//!
//! let product = source.fetch_product().await?;
//! let mut selector = VariantSelector::new(product);
//! selector.select_option(0, "Blue")?;
//! selector.select_option(1, "M")?;
//!
//! let cart = SharedCart::new(CartStore::hydrate(storage, Currency::BRL, clock, ExpiryPolicy::default()));
//! cart.update(|store| store.add(selector.line_item(1)?))?;
//!
//! let outcome = checkout(&cart, &gateway).await?;
//! println!("{}", outcome.message());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Product, ProductSource, ProductVariant, Selection, SelectionPolicy, SelectionSlot,
        SelectionSnapshot, SelectionView, VariantSelector,
    };

    // Cart
    pub use crate::cart::{
        Cart, CartItem, CartStore, CartView, ExpiryPolicy, ExpirySweep, InteractionKind,
        SharedCart, VariantKey,
    };

    // Checkout
    pub use crate::checkout::{
        checkout, Address, AddressLookup, CheckoutGateway, CheckoutLine, CheckoutOutcome,
        PostalCode, ShippingEstimate,
    };
}
