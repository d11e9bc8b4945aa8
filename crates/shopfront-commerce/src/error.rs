//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in e-commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product could not be fetched.
    #[error("Product unavailable: {0}")]
    ProductUnavailable(String),

    /// Selection is incomplete or matches no catalog variant.
    #[error("No variant matches the current selection")]
    VariantNotResolved,

    /// Resolved variant has no stock left.
    #[error("Variant {0} is out of stock")]
    OutOfStock(String),

    /// Option index outside the product's option list.
    #[error("Option index {index} out of range (product has {count} options)")]
    InvalidOption { index: usize, count: usize },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Price string could not be parsed.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout endpoint rejected or failed the submission.
    #[error("Checkout failed: {0}")]
    CheckoutFailed(String),

    /// Postal code does not have the required shape.
    #[error("Invalid postal code: {0}")]
    InvalidPostalCode(String),

    /// Lookup endpoint reported no address for the code.
    #[error("Postal code not found: {0}")]
    AddressNotFound(String),

    /// Lookup endpoint could not be reached or answered garbage.
    #[error("Address lookup failed: {0}")]
    LookupFailed(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<shopfront_cache::CacheError> for CommerceError {
    fn from(e: shopfront_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
