//! Checkout submission.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shopfront_cache::Storage;

use crate::cart::{Cart, CartStore, SharedCart};
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// Message shown after a successful submission.
pub const CHECKOUT_SUCCESS_MESSAGE: &str = "Checkout completed successfully!";
/// Message shown after a failed submission.
pub const CHECKOUT_FAILURE_MESSAGE: &str = "Checkout failed.";

/// One entry of the checkout payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutLine {
    /// Option values of the purchased variant.
    pub values: Vec<String>,
    /// Quantity.
    pub quantity: i64,
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID.
    pub variant_id: VariantId,
}

/// Build the payload for `cart`, one entry per line in cart order.
///
/// Lines without a variant id are submitted under their product id.
pub fn build_checkout(cart: &Cart) -> Result<Vec<CheckoutLine>, CommerceError> {
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }
    Ok(cart
        .items()
        .iter()
        .map(|item| CheckoutLine {
            values: item.key.values().to_vec(),
            quantity: item.quantity,
            product_id: item.product_id,
            variant_id: item
                .variant_id
                .unwrap_or_else(|| VariantId::new(item.product_id.get())),
        })
        .collect())
}

/// Third-party endpoint that accepts checkout payloads.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Submit the payload; any error means the checkout did not go through.
    async fn submit(&self, lines: &[CheckoutLine]) -> Result<(), CommerceError>;
}

/// What happened to a submitted checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Accepted; the submitted lines have been taken off the cart.
    Completed {
        /// Number of lines submitted.
        lines: usize,
        /// Cart total at submission.
        total: Money,
    },
    /// Rejected or unreachable; the cart is untouched.
    Failed {
        /// Underlying error, for logs.
        reason: String,
    },
}

impl CheckoutOutcome {
    /// Check if the checkout went through.
    pub fn is_completed(&self) -> bool {
        matches!(self, CheckoutOutcome::Completed { .. })
    }

    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            CheckoutOutcome::Completed { .. } => CHECKOUT_SUCCESS_MESSAGE,
            CheckoutOutcome::Failed { .. } => CHECKOUT_FAILURE_MESSAGE,
        }
    }
}

/// Submit the cart through `gateway` and take the submitted lines off it on success.
///
/// Lines added or topped up while the submission is in flight stay in the
/// cart. An empty cart is rejected before anything is sent. Gateway failures
/// are reported as [`CheckoutOutcome::Failed`], not as errors.
pub async fn checkout<S, G>(
    cart: &SharedCart<S>,
    gateway: &G,
) -> Result<CheckoutOutcome, CommerceError>
where
    S: Storage,
    G: CheckoutGateway + ?Sized,
{
    let snapshot = cart.snapshot();
    let lines = build_checkout(&snapshot)?;

    match gateway.submit(&lines).await {
        Ok(()) => {
            cart.update(|store| remove_submitted(store, &snapshot));
            tracing::info!(lines = lines.len(), total = %snapshot.total(), "checkout completed");
            Ok(CheckoutOutcome::Completed {
                lines: lines.len(),
                total: snapshot.total(),
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, "checkout failed");
            Ok(CheckoutOutcome::Failed {
                reason: e.to_string(),
            })
        }
    }
}

/// Subtract the submitted quantities from the cart, dropping lines that reach zero.
fn remove_submitted<S: Storage>(store: &mut CartStore<S>, submitted: &Cart) {
    for line in submitted.items() {
        let current = store
            .cart()
            .get(&line.product_id, &line.key)
            .map_or(0, |item| item.quantity);
        if let Err(e) = store.set_quantity(&line.product_id, &line.key, current - line.quantity) {
            tracing::warn!(key = %line.key, error = %e, "failed to remove submitted line");
        }
    }
}
