//! Background expiry checks tied to a mounted cart view.

use std::time::Duration;

use shopfront_cache::Storage;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::cart::SharedCart;

/// A periodic task that runs a check until stopped or dropped.
pub struct ExpirySweep {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ExpirySweep {
    /// Spawn the sweep; `check` first runs one `interval` from now.
    ///
    /// `check` returns whether it cleared anything. Must be called within a
    /// tokio runtime.
    pub fn start<F>(interval: Duration, mut check: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let (shutdown, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        if check() {
                            tracing::debug!("expiry sweep cleared data");
                        }
                    }
                }
            }
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Sweep `cart` at its policy's interval.
    pub fn for_cart<S: Storage + 'static>(cart: SharedCart<S>) -> Self {
        let interval = cart.with(|store| store.policy().sweep_interval);
        Self::start(interval, move || cart.update(|store| store.check_expiry()))
    }

    /// Check if the task is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the task and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ExpirySweep {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Raw user input observed while a cart or product view is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    Key,
    Touch,
}

/// A mounted cart surface.
///
/// While mounted, the cart is swept for expiry and every interaction
/// refreshes its timestamp. Unmounting (or dropping) stops the sweep.
pub struct CartView<S> {
    cart: SharedCart<S>,
    sweep: ExpirySweep,
}

impl<S: Storage + 'static> CartView<S> {
    /// Mount a view over `cart` and start its sweep.
    pub fn mount(cart: SharedCart<S>) -> Self {
        let sweep = ExpirySweep::for_cart(cart.clone());
        tracing::debug!("cart view mounted");
        Self { cart, sweep }
    }

    /// The cart this view shows.
    pub fn cart(&self) -> &SharedCart<S> {
        &self.cart
    }

    /// Record an interaction.
    pub fn interaction(&self, kind: InteractionKind) {
        tracing::trace!(?kind, "cart view interaction");
        self.cart.with(|store| store.touch());
    }

    /// Check if the background sweep is alive.
    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_running()
    }

    /// Stop the sweep and release the view.
    pub async fn unmount(self) {
        self.sweep.stop().await;
        tracing::debug!("cart view unmounted");
    }
}
