use web_sys::{Storage, Window};

use crate::error::{EnhanceError, EnhanceResult};
use crate::host::KeyValueStore;

/// [`KeyValueStore`] over `window.localStorage`.
///
/// Storage can be missing (privacy modes, sandboxed frames); reads then see
/// nothing and writes fail.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> EnhanceResult<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| EnhanceError::Storage("localStorage is unavailable".to_owned()))?;
        storage
            .set_item(key, value)
            .map_err(|err| EnhanceError::Storage(format!("setItem(`{key}`) failed: {err:?}")))
    }
}
