use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::host::KeyValueStore;

const ACTIVE: &str = "true";
const INACTIVE: &str = "false";

/// Page-wide "colorblind mode active" flag.
///
/// Read from storage exactly once, at construction. [`toggle`](Self::toggle)
/// is the only mutation and writes the new value straight back.
pub struct ColorblindPreference {
    store: Rc<dyn KeyValueStore>,
    key: String,
    active: Cell<bool>,
}

impl ColorblindPreference {
    #[must_use]
    pub fn load(store: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let stored = store.get(&key);
        let active = parse_persisted(stored.as_deref());
        debug!(key = %key, stored = ?stored, active, "loaded colorblind preference");
        Self {
            store,
            key,
            active: Cell::new(active),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flips the flag, persists it, and returns the new value.
    ///
    /// A failed write keeps the in-memory flip; the page stays usable and the
    /// preference simply does not survive a reload.
    pub fn toggle(&self) -> bool {
        let active = !self.active.get();
        self.active.set(active);
        let value = if active { ACTIVE } else { INACTIVE };
        if let Err(err) = self.store.set(&self.key, value) {
            warn!(error = %err, key = %self.key, "failed to persist colorblind preference");
        }
        active
    }
}

/// Only the literal `"true"` means active; absence or anything else is off.
#[must_use]
pub fn parse_persisted(value: Option<&str>) -> bool {
    value == Some(ACTIVE)
}

#[cfg(test)]
mod tests {
    use super::parse_persisted;

    #[test]
    fn malformed_values_read_as_inactive() {
        assert!(parse_persisted(Some("true")));
        assert!(!parse_persisted(Some("false")));
        assert!(!parse_persisted(Some("TRUE")));
        assert!(!parse_persisted(Some("1")));
        assert!(!parse_persisted(Some("")));
        assert!(!parse_persisted(None));
    }
}
