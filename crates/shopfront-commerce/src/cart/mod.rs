//! Shopping cart module.
//!
//! Contains the cart and its line items, the durable store with its expiry
//! window, and the background sweep that runs while a cart view is mounted.

mod cart;
mod store;
mod sweep;

pub use cart::{Cart, CartItem, VariantKey, MAX_QUANTITY_PER_ITEM};
pub use store::{CartStore, ExpiryPolicy, SharedCart, CART_ITEMS_KEY, CART_TIMESTAMP_KEY};
pub use sweep::{CartView, ExpirySweep, InteractionKind};

#[cfg(test)]
pub(crate) use cart::fixtures;
