//! The rewards ledger: balance, bonuses, ownership, theme, and progress
use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{Catalog, CatalogItem};
use crate::constants::{
    DAILY_LOGIN_POINTS, DAILY_LOGIN_REASON, DATE_STAMP_FORMAT, KEY_APPLIED_THEME, KEY_LAST_LOGIN,
    KEY_LAST_TIPS_VIEW, KEY_POINTS, KEY_PURCHASED, KEY_SORT_COUNT, MSG_INSUFFICIENT_POINTS,
    TIPS_VIEW_POINTS, TIPS_VIEW_REASON, TOAST_POINTS_MS, TOAST_SHORTFALL_MS,
};
use crate::island::IslandStage;
use crate::{Notifier, StateStore};

/// The two once-per-day bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusKind {
    DailyLogin,
    TipsViewed,
}

impl BonusKind {
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            BonusKind::DailyLogin => KEY_LAST_LOGIN,
            BonusKind::TipsViewed => KEY_LAST_TIPS_VIEW,
        }
    }

    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            BonusKind::DailyLogin => DAILY_LOGIN_REASON,
            BonusKind::TipsViewed => TIPS_VIEW_REASON,
        }
    }
}

/// Outcome of a purchase attempt. All variants are recoverable; only
/// `Purchased` mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseOutcome {
    /// Price deducted, item owned, theme switched to the item
    Purchased,
    /// Item already in the ownership set; no mutation
    AlreadyOwned,
    /// Balance below the item price; no mutation
    InsufficientPoints,
    /// No such id in the loaded catalog; no mutation
    UnknownItem,
}

/// One store row: an available item plus the flags the presentation layer
/// needs to pick a button state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEntry {
    pub item: CatalogItem,
    pub owned: bool,
    pub applied: bool,
    pub affordable: bool,
}

/// Snapshot of everything the store renderer reads: current balance plus
/// one entry per available item, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreView {
    pub balance: i64,
    pub entries: Vec<StoreEntry>,
}

/// The authoritative holder of balance, ownership, bonus-stamp, and
/// progress state, layered over a flat string key-value substrate.
///
/// Constructed once at startup and passed by reference to the presentation
/// layer; all operations take `&self` and there is exactly one logical
/// thread of control. Every persisted read has a defined fallback (0 for a
/// missing or unparsable integer, an empty set for a corrupt ownership
/// list, `None` for a missing theme or date stamp), so corrupt values never
/// surface as errors. Substrate I/O failures propagate as `Err(S::Error)`.
pub struct RewardsLedger<S, N>
where
    S: StateStore,
    N: Notifier,
{
    store: S,
    catalog: Catalog,
    notifier: N,
}

impl<S, N> RewardsLedger<S, N>
where
    S: StateStore,
    N: Notifier,
{
    /// Create a ledger over the given substrate, catalog, and notifier.
    pub const fn new(catalog: Catalog, store: S, notifier: N) -> Self {
        Self {
            store,
            catalog,
            notifier,
        }
    }

    /// Create a ledger with the catalog loaded from a [`crate::CatalogSource`].
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    pub fn from_source<C>(source: &C, store: S, notifier: N) -> Result<Self, anyhow::Error>
    where
        C: crate::CatalogSource,
        C::Error: Into<anyhow::Error>,
    {
        let catalog = source.load_catalog().map_err(Into::into)?;
        Ok(Self::new(catalog, store, notifier))
    }

    /// The loaded catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // Balance & bonuses ----------------------------------------------------

    /// Current point balance, defaulting to 0 when absent or unparsable.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn balance(&self) -> Result<i64, S::Error> {
        self.read_int(KEY_POINTS)
    }

    /// Add points and notify the user. Always succeeds; there is no upper
    /// bound on the balance. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn add_points(&self, delta: u32, reason: &str) -> Result<i64, S::Error> {
        let new_balance = self.balance()?.saturating_add(i64::from(delta));
        self.store.write(KEY_POINTS, &new_balance.to_string())?;
        self.notifier
            .notify(&format!("+{delta}P earned! ({reason})"), TOAST_POINTS_MS);
        Ok(new_balance)
    }

    /// Deduct points. Returns `false` and leaves the balance untouched when
    /// the amount exceeds the current balance, so the balance is never
    /// observed negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn spend_points(&self, amount: u32) -> Result<bool, S::Error> {
        let balance = self.balance()?;
        let amount = i64::from(amount);
        if amount > balance {
            return Ok(false);
        }
        self.store.write(KEY_POINTS, &(balance - amount).to_string())?;
        Ok(true)
    }

    /// Grant a once-per-day bonus. Grants and stamps `today` iff the
    /// persisted stamp for `kind` differs from today's date string, so the
    /// grant is idempotent within a calendar day regardless of call count.
    /// Comparison is by calendar-date equality only; calls straddling
    /// midnight in different time zones are not reconciled.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn grant_daily_bonus(
        &self,
        kind: BonusKind,
        points: u32,
        today: NaiveDate,
    ) -> Result<bool, S::Error> {
        let stamp = today.format(DATE_STAMP_FORMAT).to_string();
        if self.store.read(kind.storage_key())?.as_deref() == Some(stamp.as_str()) {
            return Ok(false);
        }
        self.add_points(points, kind.reason())?;
        self.store.write(kind.storage_key(), &stamp)?;
        Ok(true)
    }

    /// Grant the daily login bonus if today is a first login.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn check_daily_login(&self, today: NaiveDate) -> Result<bool, S::Error> {
        self.grant_daily_bonus(BonusKind::DailyLogin, DAILY_LOGIN_POINTS, today)
    }

    /// Grant the eco-tips bonus if this is the first view today.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn record_tips_view(&self, today: NaiveDate) -> Result<bool, S::Error> {
        self.grant_daily_bonus(BonusKind::TipsViewed, TIPS_VIEW_POINTS, today)
    }

    /// Last date a bonus was granted. A missing or corrupt stamp reads as
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn last_grant_date(&self, kind: BonusKind) -> Result<Option<NaiveDate>, S::Error> {
        let stamp = self.store.read(kind.storage_key())?;
        Ok(stamp.and_then(|s| NaiveDate::parse_from_str(&s, DATE_STAMP_FORMAT).ok()))
    }

    // Purchase, ownership & theme ------------------------------------------

    /// Attempt to buy an item. Checks run in order: unknown id, already
    /// owned, insufficient balance; each short-circuits without mutation.
    /// A successful purchase deducts the price, appends the id to the
    /// ownership set, and immediately applies the item as the active theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn purchase(&self, item_id: &str) -> Result<PurchaseOutcome, S::Error> {
        let Some(item) = self.catalog.find_item(item_id) else {
            return Ok(PurchaseOutcome::UnknownItem);
        };

        let mut owned = self.owned_items()?;
        if owned.iter().any(|id| id == item_id) {
            return Ok(PurchaseOutcome::AlreadyOwned);
        }

        if !self.spend_points(item.price)? {
            self.notifier.notify(MSG_INSUFFICIENT_POINTS, TOAST_SHORTFALL_MS);
            return Ok(PurchaseOutcome::InsufficientPoints);
        }

        owned.push(item_id.to_string());
        self.write_owned(&owned)?;
        self.apply_theme(Some(item_id))?;
        Ok(PurchaseOutcome::Purchased)
    }

    /// Set or clear the applied theme, unconditionally.
    ///
    /// Ownership is not checked here: gating lives in what the presentation
    /// layer chooses to render, and a direct call can apply an unowned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate write fails.
    pub fn apply_theme(&self, item_id: Option<&str>) -> Result<(), S::Error> {
        match item_id {
            Some(id) => self.store.write(KEY_APPLIED_THEME, id),
            None => self.store.delete(KEY_APPLIED_THEME),
        }
    }

    /// The currently applied theme id, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn applied_theme(&self) -> Result<Option<String>, S::Error> {
        self.store.read(KEY_APPLIED_THEME)
    }

    /// Owned item ids in purchase order. A missing or corrupt list reads as
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn owned_items(&self) -> Result<Vec<String>, S::Error> {
        let raw = self.store.read(KEY_PURCHASED)?;
        Ok(raw
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Whether the given item id has been purchased.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn owns(&self, item_id: &str) -> Result<bool, S::Error> {
        Ok(self.owned_items()?.iter().any(|id| id == item_id))
    }

    /// Owned ids resolved against the loaded catalog, purchase order
    /// preserved. Ids bought under a catalog configuration that no longer
    /// carries them are skipped, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn owned_catalog_items(&self) -> Result<Vec<&CatalogItem>, S::Error> {
        Ok(self
            .owned_items()?
            .iter()
            .filter_map(|id| self.catalog.find_item(id))
            .collect())
    }

    // Catalog passthrough --------------------------------------------------

    /// Items purchasable in the given 0-indexed month, catalog order
    /// preserved.
    #[must_use]
    pub fn available_items(&self, month0: u32) -> Vec<&CatalogItem> {
        self.catalog.available_items(month0)
    }

    /// The reconciled read the store renderer works from: balance plus
    /// per-item `owned`/`applied`/`affordable` flags for every item
    /// available this month.
    ///
    /// # Errors
    ///
    /// Returns an error if any substrate read fails.
    pub fn store_view(&self, month0: u32) -> Result<StoreView, S::Error> {
        let balance = self.balance()?;
        let owned = self.owned_items()?;
        let applied = self.applied_theme()?;
        let entries = self
            .catalog
            .available_items(month0)
            .into_iter()
            .map(|item| StoreEntry {
                owned: owned.iter().any(|id| id == &item.id),
                applied: applied.as_deref() == Some(item.id.as_str()),
                affordable: i64::from(item.price) <= balance,
                item: item.clone(),
            })
            .collect();
        Ok(StoreView { balance, entries })
    }

    // Progress (eco island) ------------------------------------------------

    /// Record one qualifying sort event and return the new count. No cap,
    /// no reset operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read or write fails.
    pub fn record_sort(&self) -> Result<u32, S::Error> {
        let count = self.sort_count()?.saturating_add(1);
        self.store.write(KEY_SORT_COUNT, &count.to_string())?;
        Ok(count)
    }

    /// Current sort count, defaulting to 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn sort_count(&self) -> Result<u32, S::Error> {
        let raw = self.store.read(KEY_SORT_COUNT)?;
        Ok(raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0))
    }

    /// Island stage for the current sort count.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate read fails.
    pub fn island_stage(&self) -> Result<IslandStage, S::Error> {
        Ok(IslandStage::for_count(self.sort_count()?))
    }

    // Internal helpers -----------------------------------------------------

    fn read_int(&self, key: &str) -> Result<i64, S::Error> {
        let raw = self.store.read(key)?;
        Ok(raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0))
    }

    fn write_owned(&self, owned: &[String]) -> Result<(), S::Error> {
        let json = serde_json::to_string(owned).unwrap_or_else(|_| "[]".to_string());
        self.store.write(KEY_PURCHASED, &json)
    }
}
