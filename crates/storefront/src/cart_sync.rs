//! Background persistence of the cart.
//!
//! Every replacement of the cart publishes a new [`CartSnapshot`] on a
//! `watch` channel. A single task waits on that channel and pushes the
//! latest snapshot to `POST /api/cart/update`.
//!
//! The channel holds one slot. Mutations made while a persist call is in
//! flight overwrite each other, and the task picks up only the newest one
//! when the call returns. Persist calls are therefore issued one at a time,
//! in mutation order, and the last call always carries the newest local
//! cart. Intermediate snapshots may never reach the backend.
//!
//! Failures are reported as notifications and not retried; the next
//! mutation sends the whole cart again.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use market_core::CartItems;

use crate::api::StoreApi;
use crate::models::User;
use crate::notify::Notifier;
use crate::telemetry;

/// Where a cart value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOrigin {
    /// Changed by the user in this process; needs persisting.
    Local,
    /// Loaded from (or cleared together with) the backend session; already
    /// matches what the backend holds.
    Remote,
}

/// One published version of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Increases by one on every replacement.
    pub version: u64,
    pub items: Arc<CartItems>,
    pub origin: CartOrigin,
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            items: Arc::new(CartItems::new()),
            origin: CartOrigin::Remote,
        }
    }
}

/// Channels the sync task works with. Holds no reference back to the
/// state container, so the task ends once the container is dropped.
pub(crate) struct CartSync {
    pub cart: watch::Receiver<CartSnapshot>,
    pub user: watch::Receiver<Option<Arc<User>>>,
    pub synced: watch::Sender<u64>,
    pub api: Arc<dyn StoreApi>,
    pub notifier: Notifier,
}

impl CartSync {
    /// Run until the cart sender is dropped.
    pub(crate) async fn run(mut self) {
        while self.cart.changed().await.is_ok() {
            let snapshot = self.cart.borrow_and_update().clone();
            let signed_in = self.user.borrow().is_some();

            if snapshot.origin == CartOrigin::Local && signed_in {
                self.persist(&snapshot).await;
            } else {
                debug!(
                    version = snapshot.version,
                    origin = ?snapshot.origin,
                    signed_in,
                    "Cart change not persisted"
                );
            }

            self.synced.send_replace(snapshot.version);
        }
        debug!("Cart sync stopped");
    }

    #[instrument(skip(self, snapshot), fields(version = snapshot.version, entries = snapshot.items.len()))]
    async fn persist(&self, snapshot: &CartSnapshot) {
        match self.api.update_cart(&snapshot.items).await {
            Ok(resp) if resp.success => debug!("Cart persisted"),
            Ok(resp) => {
                let message = resp
                    .message
                    .unwrap_or_else(|| "Failed to save cart".to_string());
                warn!(message = %message, "Cart persist rejected");
                self.notifier.error(message);
            }
            Err(e) => {
                warn!(error = %e, "Cart persist failed");
                telemetry::capture_error(&e);
                self.notifier.error(e.user_message());
            }
        }
    }
}
