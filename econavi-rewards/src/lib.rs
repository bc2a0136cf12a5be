//! EcoNavi Rewards Ledger
//!
//! Platform-agnostic core of the EcoNavi gamification layer: point wallet,
//! cosmetic item catalog, purchase/ownership tracking, once-per-day bonuses,
//! and the eco island progress counter. This crate carries no UI or
//! platform-specific dependencies; hosts supply the persistence substrate,
//! the notification sink, and the current date.

pub mod catalog;
pub mod constants;
pub mod island;
pub mod ledger;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, CatalogItem, ItemKind, Season};
pub use island::IslandStage;
pub use ledger::{BonusKind, PurchaseOutcome, RewardsLedger, StoreEntry, StoreView};

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

/// Trait for abstracting the flat string key-value persistence substrate.
/// Platform-specific implementations should provide this.
///
/// The substrate is shared mutable state with a read-modify-write pattern
/// on every ledger mutation. Concurrent writers (for example two browser
/// tabs over the same profile) are last-writer-wins, with no merge and no
/// detection. That is a documented limitation of the single-user,
/// single-view scope, not something implementations should try to fix.
pub trait StateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key` entirely. Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be written.
    fn delete(&self, key: &str) -> Result<(), Self::Error>;
}

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Optional notification sink, resolved at ledger construction time.
///
/// The ledger notifies on point grants and on failed purchases; everything
/// else is silent. Hosts without a toast surface use [`NoopNotifier`].
pub trait Notifier {
    fn notify(&self, message: &str, duration_ms: u32);
}

/// The documented no-op default for hosts without a notification surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str, _duration_ms: u32) {}
}

/// In-memory substrate for tests and headless harnesses.
///
/// Clones share the same map, mirroring how every browser handle sees the
/// same `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl StateStore for MemoryStore {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
