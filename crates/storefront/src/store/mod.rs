//! Key-value persistence for storefront state.
//!
//! Every piece of shopper state lives in a named [`Slot`] holding one JSON
//! document. Services talk to the [`KeyValueStore`] trait only, so the
//! backend can be swapped without touching business logic.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local, used by tests and one-shot runs
//! - [`JsonFileStore`] - a single JSON file in the data directory

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Named storage slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Cart,
    Wishlist,
    Notifications,
    NotificationPreferences,
    Loyalty,
    Orders,
}

impl Slot {
    pub const ALL: [Self; 6] = [
        Self::Cart,
        Self::Wishlist,
        Self::Notifications,
        Self::NotificationPreferences,
        Self::Loyalty,
        Self::Orders,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
            Self::Notifications => "notifications",
            Self::NotificationPreferences => "notification-preferences",
            Self::Loyalty => "loyalty",
            Self::Orders => "orders",
        }
    }
}

/// A string-valued store keyed by [`Slot`].
///
/// Writes are last-write-wins; there is no cross-slot transaction.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot's raw value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, slot: Slot) -> Result<Option<String>, StoreError>;

    /// Replace a slot's value. `value` must be a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn set(&self, slot: Slot, value: String) -> Result<(), StoreError>;

    /// Delete a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, slot: Slot) -> Result<(), StoreError>;

    /// Delete every slot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Load and decode a slot.
///
/// A value that no longer decodes is logged, removed and reported as absent
/// so that one bad slot does not wedge the storefront.
///
/// # Errors
///
/// Returns `StoreError` only if the backend itself fails.
pub fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    slot: Slot,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(slot)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "Discarding unreadable slot");
            store.remove(slot)?;
            Ok(None)
        }
    }
}

/// Encode and store a value.
///
/// # Errors
///
/// Returns `StoreError` if encoding or the backend write fails.
pub fn save<T: Serialize>(store: &dyn KeyValueStore, slot: Slot, value: &T) -> Result<(), StoreError> {
    store.set(slot, serde_json::to_string(value)?)
}
