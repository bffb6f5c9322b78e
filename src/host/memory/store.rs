use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

use crate::error::{EnhanceError, EnhanceResult};
use crate::host::KeyValueStore;

/// In-memory key-value store, optionally refusing writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<IndexMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        store
    }

    /// Simulates a quota-exceeded or disabled storage backend.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> EnhanceResult<()> {
        if self.read_only.get() {
            return Err(EnhanceError::Storage(format!(
                "write to `{key}` rejected by read-only store"
            )));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
