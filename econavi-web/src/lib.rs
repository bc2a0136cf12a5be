#![forbid(unsafe_code)]
//! Browser adapter for the EcoNavi rewards ledger.
//!
//! Wires the platform-agnostic ledger to `localStorage`, toast events, and
//! the body-level theme classes. The host page renders all chrome (store
//! modal, theme switcher, island widget) and calls into the ledger through
//! this crate.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod clock;
pub mod data;
pub mod dom;
pub mod notify;
pub mod storage;
pub mod theme;

// Re-export the core ledger types for the host-facing surface
pub use econavi_rewards::{
    BonusKind, Catalog, CatalogError, CatalogItem, CatalogSource, IslandStage, ItemKind,
    NoopNotifier, Notifier, PurchaseOutcome, RewardsLedger, Season, StateStore, StoreEntry,
    StoreView, constants,
};

use data::{CatalogVariant, WebCatalogLoader};
use notify::ToastNotifier;
use storage::BrowserStore;

/// Assemble the ledger over `localStorage` and the toast event sink, with
/// the seasonal catalog configuration.
///
/// # Errors
///
/// Returns an error if the embedded catalog fails to parse.
pub fn create_web_ledger() -> anyhow::Result<RewardsLedger<BrowserStore, ToastNotifier>> {
    RewardsLedger::from_source(
        &WebCatalogLoader::new(CatalogVariant::Seasonal),
        BrowserStore,
        ToastNotifier,
    )
}

/// Startup sequence: re-apply the persisted theme and grant the daily
/// login bonus. Store and island rendering happen lazily when the host
/// page opens the corresponding overlays.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let ledger = match create_web_ledger() {
        Ok(ledger) => ledger,
        Err(e) => {
            dom::console_error(&format!("rewards ledger unavailable: {e}"));
            return;
        }
    };

    match ledger.applied_theme() {
        Ok(applied) => theme::apply_to_body(ledger.catalog(), applied.as_deref()),
        Err(e) => dom::console_error(&format!("theme restore failed: {e}")),
    }

    if let Err(e) = ledger.check_daily_login(clock::today_local()) {
        dom::console_error(&format!("daily login bonus failed: {e}"));
    }
}
