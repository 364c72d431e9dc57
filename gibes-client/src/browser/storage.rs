use anyhow::{Result, anyhow};
use gibes::storage::KeyValueStore;
use gloo_storage::{LocalStorage, Storage};

/// `localStorage`, read and written as raw strings.
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| anyhow!("Failed to write {}: {:?}", key, e))
    }
}
