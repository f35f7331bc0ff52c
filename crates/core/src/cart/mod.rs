//! Cart
//!
//! Client-side shopping cart: an in-memory list of line items, persisted to a
//! local snapshot on every change and mirrored to the storefront API while a
//! user is signed in.

mod errors;
#[cfg(test)]
pub(crate) mod fixtures;
mod gateway;
mod item;
mod snapshot;
mod store;
mod sync;

pub use errors::CartError;
pub use gateway::{CartGateway, GatewayError, HttpCartGateway, MockCartGateway};
pub use item::{CartItem, CartKey, CartProduct, merge_items};
pub use snapshot::{
    CartSnapshot, FileSnapshotStore, MemorySnapshotStore, SNAPSHOT_VERSION, SnapshotError,
    SnapshotStore,
};
pub use store::CartStore;
pub use sync::{SyncOutcome, SyncQueue, SyncStatus};
