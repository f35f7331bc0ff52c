//! Cart Store

use std::{fmt, sync::Arc};

use rusty_money::{Money, iso::Currency};
use tracing::{info, warn};

use super::{
    CartError, CartGateway, CartItem, CartKey, CartProduct, CartSnapshot, SnapshotStore,
    SyncOutcome, SyncQueue, SyncStatus, merge_items,
};
use crate::{
    credential::Credential,
    money::{self, MinorUnits},
};

/// The shopper's cart.
///
/// Every mutation is written to the local snapshot store. While a credential
/// is attached, every mutation is also queued for the remote cart.
pub struct CartStore {
    items: Vec<CartItem>,
    credential: Option<Credential>,
    gateway: Arc<dyn CartGateway>,
    snapshots: Box<dyn SnapshotStore>,
    sync: SyncQueue,
    last_error: Option<String>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("credential", &self.credential)
            .field("sync", &self.sync)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store, restoring items from the last saved snapshot.
    ///
    /// Unreadable snapshots and snapshots from another format version start
    /// the store empty. Must be called within a Tokio runtime.
    pub fn new(gateway: Arc<dyn CartGateway>, snapshots: Box<dyn SnapshotStore>) -> Self {
        let mut store = Self {
            items: Vec::new(),
            credential: None,
            sync: SyncQueue::spawn(Arc::clone(&gateway)),
            gateway,
            snapshots,
            last_error: None,
        };

        if let Err(error) = store.reload_snapshot() {
            warn!(%error, "discarding unreadable cart snapshot");
        }

        store
    }

    /// Current line items, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line with the given key.
    pub fn item(&self, key: &CartKey) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == key)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }

    /// Sum of line totals in minor units.
    pub fn total_minor(&self) -> MinorUnits {
        self.items
            .iter()
            .fold(0, |total: MinorUnits, item| {
                total.saturating_add(item.line_total())
            })
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money<'static, Currency> {
        money::from_minor(self.total_minor())
    }

    /// Credential the cart is currently synchronised under.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Message from the most recent failed remote operation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Progress of queued remote writes.
    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Wait for queued remote writes to be attempted.
    ///
    /// A failed write is recorded as the store's last error.
    pub async fn flush(&mut self) -> SyncStatus {
        let status = self.sync.flush().await;

        if let Some(SyncOutcome::Failed(message)) = &status.outcome {
            self.last_error = Some(message.clone());
        }

        status
    }

    /// Add `qty` units of `product`, merging into an existing line with the
    /// same name and size.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `qty` is zero; the cart is
    /// left unchanged.
    pub fn add_to_cart(&mut self, product: CartProduct, qty: u32) -> Result<(), CartError> {
        if qty == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let key = product.key();

        match self.items.iter_mut().find(|item| item.id == key) {
            Some(existing) => existing.qty = existing.qty.saturating_add(qty),
            None => self.items.push(CartItem::new(product, qty)),
        }

        self.commit();

        Ok(())
    }

    /// Remove a line. Unknown keys are ignored.
    pub fn remove_from_cart(&mut self, key: &CartKey) {
        let before = self.items.len();

        self.items.retain(|item| &item.id != key);

        if self.items.len() != before {
            self.commit();
        }
    }

    /// Set a line's quantity. Zero removes the line; unknown keys are ignored.
    pub fn update_qty(&mut self, key: &CartKey, qty: u32) {
        if qty == 0 {
            self.remove_from_cart(key);

            return;
        }

        let Some(item) = self.items.iter_mut().find(|item| &item.id == key) else {
            return;
        };

        if item.qty != qty {
            item.qty = qty;
            self.commit();
        }
    }

    /// Empty the cart locally. With `remote` set and a credential attached,
    /// the remote cart is cleared as well.
    pub fn clear_cart(&mut self, remote: bool) {
        self.items.clear();
        self.persist();

        if remote && let Some(credential) = &self.credential {
            self.sync.enqueue_clear(credential);
        }
    }

    /// Load the user's remote cart and attach `credential` for later syncs.
    ///
    /// With `merge_local` set and local items present, the local lines are
    /// merged into the remote ones and the result is pushed back. Otherwise
    /// the remote cart replaces local state.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cart cannot be fetched. Local items are
    /// kept, the failure is recorded as the store's last error and the
    /// credential is not attached, so later local changes never overwrite a
    /// remote cart that was not loaded.
    pub async fn hydrate_from_backend(
        &mut self,
        credential: Credential,
        merge_local: bool,
    ) -> Result<(), CartError> {
        let remote = match self.gateway.get_cart(&credential).await {
            Ok(remote) => remote,
            Err(error) => {
                warn!(%error, "failed to load remote cart");
                self.last_error = Some(error.to_string());

                return Err(error.into());
            }
        };

        self.credential = Some(credential);
        self.last_error = None;

        if merge_local && !self.items.is_empty() {
            let local = std::mem::take(&mut self.items);

            self.items = merge_items(remote, &local);

            info!(lines = self.items.len(), "merged local cart into remote cart");

            self.commit();
        } else {
            self.items = remote;
            self.persist();
        }

        Ok(())
    }

    /// Queue a write of the current items to the remote cart of `credential`.
    pub fn sync_to_backend(&mut self, credential: &Credential) -> u64 {
        self.sync.enqueue_replace(credential, self.items.clone())
    }

    /// Queue a clear of the remote cart of `credential`, whether or not it is
    /// the attached one.
    pub fn clear_backend(&mut self, credential: &Credential) -> u64 {
        self.sync.enqueue_clear(credential)
    }

    /// Stop syncing, returning the credential that was attached.
    pub fn detach_credential(&mut self) -> Option<Credential> {
        self.credential.take()
    }

    /// Replace in-memory items with the saved snapshot, e.g. after another
    /// process changed it. Returns whether a current snapshot was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub fn reload_snapshot(&mut self) -> Result<bool, CartError> {
        let snapshot = self.snapshots.load()?;

        match snapshot.and_then(CartSnapshot::into_current) {
            Some(items) => {
                self.items = items;

                Ok(true)
            }
            None => {
                self.items.clear();

                Ok(false)
            }
        }
    }

    fn commit(&mut self) {
        self.persist();

        if let Some(credential) = self.credential.clone() {
            self.sync_to_backend(&credential);
        }
    }

    fn persist(&mut self) {
        if let Err(error) = self.snapshots.save(&CartSnapshot::new(self.items.clone())) {
            warn!(%error, "failed to save cart snapshot");
            self.last_error = Some(error.to_string());
        }
    }
}
