//! `localStorage`-backed persistence substrate
//!
//! Values are written as raw strings rather than through a JSON layer so
//! the persisted shapes stay byte-compatible with profiles written by
//! earlier releases (`ecoNaviPoints` holds `42`, not `"42"`).

use econavi_rewards::StateStore;
use web_sys::Storage;

use crate::dom;

#[derive(Debug, thiserror::Error)]
pub enum BrowserStoreError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Persistence substrate over the browser profile's `localStorage`.
///
/// Durable across sessions but scoped to one browser profile. Two tabs
/// writing the same keys are last-writer-wins; see [`StateStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn handle(&self) -> Result<Storage, BrowserStoreError> {
        dom::local_storage()
            .map_err(|e| BrowserStoreError::Unavailable(dom::js_error_message(&e)))
    }
}

impl StateStore for BrowserStore {
    type Error = BrowserStoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.handle()?
            .get_item(key)
            .map_err(|e| BrowserStoreError::Operation(dom::js_error_message(&e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        // Quota-exceeded failures surface here.
        self.handle()?
            .set_item(key, value)
            .map_err(|e| BrowserStoreError::Operation(dom::js_error_message(&e)))
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.handle()?
            .remove_item(key)
            .map_err(|e| BrowserStoreError::Operation(dom::js_error_message(&e)))
    }
}
