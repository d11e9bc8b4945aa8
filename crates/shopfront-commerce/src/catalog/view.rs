//! Keep-alive for a product page snapshot while the page is shown.

use std::sync::Arc;
use std::time::Duration;

use shopfront_cache::{SnapshotSlot, Storage};

use crate::cart::{ExpirySweep, InteractionKind};
use crate::catalog::SelectionSnapshot;

/// Slot holding one product's page snapshot.
pub type SelectionSlot<S> = SnapshotSlot<SelectionSnapshot, S>;

/// A mounted product page.
///
/// While mounted, the page snapshot is swept for expiry and every interaction
/// refreshes its timestamp. Unmounting (or dropping) stops the sweep.
pub struct SelectionView<S> {
    slot: Arc<SelectionSlot<S>>,
    sweep: ExpirySweep,
}

impl<S: Storage + 'static> SelectionView<S> {
    /// Mount a view over `slot`, sweeping it every `interval`.
    pub fn mount(slot: SelectionSlot<S>, interval: Duration) -> Self {
        let slot = Arc::new(slot);
        let swept = Arc::clone(&slot);
        let sweep = ExpirySweep::start(interval, move || swept.sweep());
        tracing::debug!(key = slot.key(), "selection view mounted");
        Self { slot, sweep }
    }

    /// The snapshot slot this view keeps alive.
    pub fn slot(&self) -> &SelectionSlot<S> {
        &self.slot
    }

    /// Record an interaction. Returns whether there was a snapshot to refresh.
    pub fn interaction(&self, kind: InteractionKind) -> bool {
        tracing::trace!(?kind, key = self.slot.key(), "selection view interaction");
        match self.slot.touch() {
            Ok(touched) => touched,
            Err(e) => {
                tracing::warn!(key = self.slot.key(), error = %e, "failed to refresh selection timestamp");
                false
            }
        }
    }

    /// Check if the background sweep is alive.
    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_running()
    }

    /// Stop the sweep and release the view.
    pub async fn unmount(self) {
        self.sweep.stop().await;
        tracing::debug!(key = self.slot.key(), "selection view unmounted");
    }
}
