//! Durable cart store with an expiry window.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use shopfront_cache::{is_expired, Cache, Clock, Storage};

use crate::cart::{Cart, CartItem, VariantKey};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Storage key for the persisted line items.
pub const CART_ITEMS_KEY: &str = "cart:items";

/// Storage key for the last-refresh timestamp (epoch millis).
pub const CART_TIMESTAMP_KEY: &str = "cart:timestamp";

/// When a persisted cart is considered abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Maximum age of the stored timestamp.
    pub ttl: Duration,
    /// How often a mounted cart view re-checks expiry.
    pub sweep_interval: Duration,
    /// Whether changing only a line's quantity refreshes the timestamp.
    pub refresh_on_quantity_edit: bool,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            sweep_interval: Duration::from_secs(60),
            refresh_on_quantity_edit: false,
        }
    }
}

/// A cart mirrored to durable storage.
///
/// Every mutation writes the full line list. The timestamp is refreshed on
/// hydration, whenever the number of lines changes and on [`touch`](Self::touch);
/// quantity-only edits leave it alone unless the policy says otherwise.
pub struct CartStore<S> {
    cart: Cart,
    cache: Cache<S>,
    clock: Arc<dyn Clock>,
    policy: ExpiryPolicy,
}

impl<S: Storage> CartStore<S> {
    /// Load the persisted cart, discarding it first if it has expired.
    ///
    /// Unreadable data yields an empty cart.
    pub fn hydrate(
        store: S,
        currency: Currency,
        clock: Arc<dyn Clock>,
        policy: ExpiryPolicy,
    ) -> Self {
        let mut this = Self {
            cart: Cart::new(currency),
            cache: Cache::new(store),
            clock,
            policy,
        };

        if this.discard_if_expired() {
            tracing::info!("persisted cart expired before load");
        } else if let Some(items) = this.cache.load::<Vec<CartItem>>(CART_ITEMS_KEY) {
            this.cart = Cart::from_items(items, currency);
        }
        tracing::debug!(lines = this.cart.unique_item_count(), "cart hydrated");

        this.persist_items();
        this.stamp();
        this
    }

    /// The in-memory cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The expiry policy in force.
    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    /// Add an item and persist.
    pub fn add(&mut self, item: CartItem) -> Result<(), CommerceError> {
        let lines_before = self.cart.unique_item_count();
        self.cart.add(item)?;
        self.commit(lines_before);
        Ok(())
    }

    /// Remove a line and persist. Returns whether one was removed.
    pub fn remove(&mut self, product_id: &ProductId, key: &VariantKey) -> bool {
        let lines_before = self.cart.unique_item_count();
        let removed = self.cart.remove(product_id, key);
        if removed {
            self.commit(lines_before);
        }
        removed
    }

    /// Overwrite a line's quantity and persist; zero or less removes it.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        key: &VariantKey,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        let lines_before = self.cart.unique_item_count();
        let changed = self.cart.set_quantity(product_id, key, quantity)?;
        if changed {
            self.commit(lines_before);
        }
        Ok(changed)
    }

    /// Empty the cart and persist.
    pub fn clear(&mut self) {
        let lines_before = self.cart.unique_item_count();
        self.cart.clear();
        self.commit(lines_before);
    }

    /// Record a user interaction: refresh the timestamp.
    pub fn touch(&self) {
        self.stamp();
    }

    /// Clear the cart if the stored timestamp is past the TTL.
    ///
    /// Returns whether the cart was cleared.
    pub fn check_expiry(&mut self) -> bool {
        if !self.discard_if_expired() {
            return false;
        }
        self.cart.clear();
        tracing::info!("cart expired and was cleared");
        true
    }

    /// When the stored cart will expire, in epoch millis.
    pub fn expires_at(&self) -> Option<i64> {
        let ttl = i64::try_from(self.policy.ttl.as_millis()).unwrap_or(i64::MAX);
        self.stored_timestamp()
            .map(|stamped| stamped.saturating_add(ttl))
    }

    fn commit(&mut self, lines_before: usize) {
        self.persist_items();
        if self.cart.unique_item_count() != lines_before || self.policy.refresh_on_quantity_edit {
            self.stamp();
        }
    }

    fn stored_timestamp(&self) -> Option<i64> {
        self.cache.load::<i64>(CART_TIMESTAMP_KEY)
    }

    /// Remove both keys if the stored timestamp is stale.
    fn discard_if_expired(&self) -> bool {
        let Some(stamped) = self.stored_timestamp() else {
            return false;
        };
        if !is_expired(stamped, self.clock.now_millis(), self.policy.ttl) {
            return false;
        }
        for key in [CART_ITEMS_KEY, CART_TIMESTAMP_KEY] {
            if let Err(e) = self.cache.delete(key) {
                tracing::warn!(key, error = %e, "failed to remove expired cart data");
            }
        }
        true
    }

    fn persist_items(&self) {
        match self.cache.set(CART_ITEMS_KEY, self.cart.items()) {
            Ok(()) => tracing::debug!(lines = self.cart.unique_item_count(), "cart persisted"),
            Err(e) => tracing::warn!(error = %e, "failed to persist cart"),
        }
    }

    fn stamp(&self) {
        if let Err(e) = self.cache.set(CART_TIMESTAMP_KEY, &self.clock.now_millis()) {
            tracing::warn!(error = %e, "failed to refresh cart timestamp");
        }
    }
}

/// The application's one cart, shared by handle between front-end surfaces.
///
/// Created once at start-up and cloned into whatever needs it. Each call holds
/// the lock for one synchronous operation only.
pub struct SharedCart<S> {
    inner: Arc<Mutex<CartStore<S>>>,
}

impl<S> Clone for SharedCart<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Storage> SharedCart<S> {
    /// Share an owned store.
    pub fn new(store: CartStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Read from the store.
    pub fn with<R>(&self, f: impl FnOnce(&CartStore<S>) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the store.
    pub fn update<R>(&self, f: impl FnOnce(&mut CartStore<S>) -> R) -> R {
        f(&mut self.lock())
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.with(|store| store.cart().clone())
    }

    /// Badge count: sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.with(|store| store.cart().item_count())
    }

    /// Current cart total.
    pub fn total(&self) -> Money {
        self.with(|store| store.cart().total())
    }

    fn lock(&self) -> MutexGuard<'_, CartStore<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
