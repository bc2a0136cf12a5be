//! Storage keys and tuning constants for the rewards ledger.
//!
//! The `ecoNavi*` keys are fixed: profiles written by earlier releases use
//! the same names, so renaming any of them would orphan existing balances.

// Persisted key space ------------------------------------------------------
pub const KEY_POINTS: &str = "ecoNaviPoints";
pub const KEY_PURCHASED: &str = "ecoNaviPurchasedItems";
pub const KEY_APPLIED_THEME: &str = "ecoNaviAppliedTheme";
pub const KEY_LAST_LOGIN: &str = "ecoNaviLastLogin";
pub const KEY_LAST_TIPS_VIEW: &str = "ecoNaviLastTipsView";
pub const KEY_SORT_COUNT: &str = "ecoNaviSortCount";

// Bonus stamps are local calendar dates, compared as strings.
pub const DATE_STAMP_FORMAT: &str = "%Y-%m-%d";

// Bonus tuning -------------------------------------------------------------
pub const DAILY_LOGIN_POINTS: u32 = 1;
pub const TIPS_VIEW_POINTS: u32 = 5;
pub const DAILY_LOGIN_REASON: &str = "first login of the day";
pub const TIPS_VIEW_REASON: &str = "read an eco tip";

// Notification tuning ------------------------------------------------------
pub const TOAST_POINTS_MS: u32 = 2_500;
pub const TOAST_SHORTFALL_MS: u32 = 3_000;
pub const MSG_INSUFFICIENT_POINTS: &str = "Not enough points.";
