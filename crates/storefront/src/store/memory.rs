//! In-process store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, Slot, StoreError};

/// A store that lives and dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<Slot, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        let slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(slots.get(&slot).cloned())
    }

    fn set(&self, slot: Slot, value: String) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        slots.insert(slot, value);
        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        slots.remove(&slot);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().map_err(|_| StoreError::Poisoned)?;
        slots.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove_clear() {
        let store = MemoryStore::new();
        store.set(Slot::Cart, "[]".to_string()).unwrap();
        store.set(Slot::Orders, "[]".to_string()).unwrap();
        assert_eq!(store.get(Slot::Cart).unwrap().as_deref(), Some("[]"));

        store.remove(Slot::Cart).unwrap();
        assert!(store.get(Slot::Cart).unwrap().is_none());
        store.remove(Slot::Cart).unwrap();

        store.clear().unwrap();
        assert!(store.get(Slot::Orders).unwrap().is_none());
    }
}
