//! End-to-end ledger flows over the in-memory substrate.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use econavi_rewards::constants::{
    KEY_APPLIED_THEME, KEY_POINTS, KEY_PURCHASED, KEY_SORT_COUNT, MSG_INSUFFICIENT_POINTS,
    TOAST_POINTS_MS, TOAST_SHORTFALL_MS,
};
use econavi_rewards::{
    BonusKind, Catalog, MemoryStore, Notifier, PurchaseOutcome, RewardsLedger, StateStore,
};

/// Captures every toast the ledger emits, for message assertions.
#[derive(Clone, Default)]
struct RecordingNotifier {
    messages: Rc<RefCell<Vec<(String, u32)>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, duration_ms: u32) {
        self.messages
            .borrow_mut()
            .push((message.to_string(), duration_ms));
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_ledger(store: &MemoryStore) -> (RewardsLedger<MemoryStore, RecordingNotifier>, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let ledger = RewardsLedger::new(Catalog::default_config(), store.clone(), notifier.clone());
    (ledger, notifier)
}

#[test]
fn balance_equals_sum_of_deltas() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);

    let deltas = [3u32, 15, 1, 0, 42];
    for delta in deltas {
        ledger.add_points(delta, "sorting").unwrap();
    }
    let expected: i64 = deltas.iter().map(|d| i64::from(*d)).sum();
    assert_eq!(ledger.balance().unwrap(), expected);
}

#[test]
fn spend_never_leaves_balance_negative() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    ledger.add_points(25, "seed").unwrap();

    assert!(!ledger.spend_points(26).unwrap());
    assert_eq!(ledger.balance().unwrap(), 25);
    assert!(ledger.spend_points(25).unwrap());
    assert_eq!(ledger.balance().unwrap(), 0);
    assert!(!ledger.spend_points(1).unwrap());
    assert_eq!(ledger.balance().unwrap(), 0);
}

#[test]
fn daily_bonus_grants_once_per_day() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    let today = date(2025, 6, 2);

    assert!(ledger.check_daily_login(today).unwrap());
    for _ in 0..5 {
        assert!(!ledger.check_daily_login(today).unwrap());
    }
    assert_eq!(ledger.balance().unwrap(), 1);
    assert_eq!(
        ledger.last_grant_date(BonusKind::DailyLogin).unwrap(),
        Some(today)
    );
}

#[test]
fn daily_bonus_regrants_after_date_rollover() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);

    assert!(ledger.record_tips_view(date(2025, 6, 2)).unwrap());
    assert!(!ledger.record_tips_view(date(2025, 6, 2)).unwrap());
    assert!(ledger.record_tips_view(date(2025, 6, 3)).unwrap());
    assert_eq!(ledger.balance().unwrap(), 10);
}

#[test]
fn bonus_kinds_stamp_independently() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    let today = date(2025, 6, 2);

    assert!(ledger.check_daily_login(today).unwrap());
    // The tips stamp is untouched by the login grant.
    assert!(ledger.record_tips_view(today).unwrap());
    assert_eq!(ledger.balance().unwrap(), 6);
}

#[test]
fn purchase_deducts_owns_and_applies() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    ledger.add_points(100, "seed").unwrap();

    assert_eq!(
        ledger.purchase("bg-fall").unwrap(),
        PurchaseOutcome::Purchased
    );
    assert_eq!(ledger.balance().unwrap(), 90);
    assert!(ledger.owns("bg-fall").unwrap());
    assert_eq!(ledger.applied_theme().unwrap().as_deref(), Some("bg-fall"));
}

#[test]
fn second_purchase_reports_already_owned_without_deducting() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    ledger.add_points(100, "seed").unwrap();

    assert_eq!(
        ledger.purchase("bg-fresh-green").unwrap(),
        PurchaseOutcome::Purchased
    );
    let after_first = ledger.balance().unwrap();
    assert_eq!(
        ledger.purchase("bg-fresh-green").unwrap(),
        PurchaseOutcome::AlreadyOwned
    );
    assert_eq!(ledger.balance().unwrap(), after_first);
    assert_eq!(ledger.owned_items().unwrap(), vec!["bg-fresh-green"]);
}

#[test]
fn already_owned_wins_even_when_wallet_is_empty() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    ledger.add_points(20, "seed").unwrap();

    assert_eq!(
        ledger.purchase("bg-snowy").unwrap(),
        PurchaseOutcome::Purchased
    );
    assert_eq!(ledger.balance().unwrap(), 0);
    // The ownership check runs before the funds check.
    assert_eq!(
        ledger.purchase("bg-snowy").unwrap(),
        PurchaseOutcome::AlreadyOwned
    );
}

#[test]
fn unknown_item_is_rejected_without_mutation() {
    let store = MemoryStore::default();
    let (ledger, notifier) = new_ledger(&store);
    ledger.add_points(100, "seed").unwrap();
    notifier.messages.borrow_mut().clear();

    assert_eq!(
        ledger.purchase("bg-nonexistent").unwrap(),
        PurchaseOutcome::UnknownItem
    );
    assert_eq!(ledger.balance().unwrap(), 100);
    assert!(ledger.owned_items().unwrap().is_empty());
    assert!(notifier.messages.borrow().is_empty());
}

#[test]
fn insufficient_points_notifies_and_leaves_state() {
    let store = MemoryStore::default();
    let (ledger, notifier) = new_ledger(&store);
    ledger.add_points(5, "seed").unwrap();
    notifier.messages.borrow_mut().clear();

    assert_eq!(
        ledger.purchase("bg-spring").unwrap(),
        PurchaseOutcome::InsufficientPoints
    );
    assert_eq!(ledger.balance().unwrap(), 5);
    assert!(ledger.owned_items().unwrap().is_empty());
    assert_eq!(
        *notifier.messages.borrow(),
        vec![(MSG_INSUFFICIENT_POINTS.to_string(), TOAST_SHORTFALL_MS)]
    );
}

#[test]
fn grant_toast_carries_delta_and_reason() {
    let store = MemoryStore::default();
    let (ledger, notifier) = new_ledger(&store);

    ledger.add_points(5, "read an eco tip").unwrap();
    assert_eq!(
        *notifier.messages.borrow(),
        vec![(
            "+5P earned! (read an eco tip)".to_string(),
            TOAST_POINTS_MS
        )]
    );
}

#[test]
fn purchases_append_in_order() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    ledger.add_points(100, "seed").unwrap();

    ledger.purchase("bg-winter").unwrap();
    ledger.purchase("bg-spring").unwrap();
    ledger.purchase("bg-summer").unwrap();
    assert_eq!(
        ledger.owned_items().unwrap(),
        vec!["bg-winter", "bg-spring", "bg-summer"]
    );
    // The persisted shape is a plain JSON array of ids.
    assert_eq!(
        store.read(KEY_PURCHASED).unwrap().as_deref(),
        Some(r#"["bg-winter","bg-spring","bg-summer"]"#)
    );
}

#[test]
fn apply_theme_sets_and_clears_without_ownership_check() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);

    // Never purchased, applied anyway: gating is the caller's concern.
    ledger.apply_theme(Some("bg-new-year")).unwrap();
    assert_eq!(
        ledger.applied_theme().unwrap().as_deref(),
        Some("bg-new-year")
    );

    ledger.apply_theme(None).unwrap();
    assert_eq!(ledger.applied_theme().unwrap(), None);
    assert_eq!(store.read(KEY_APPLIED_THEME).unwrap(), None);
}

#[test]
fn owned_catalog_items_skip_stale_ids() {
    let store = MemoryStore::default();
    store
        .write(KEY_PURCHASED, r#"["bg-retired","bg-fall"]"#)
        .unwrap();
    let (ledger, _) = new_ledger(&store);

    let resolved = ledger.owned_catalog_items().unwrap();
    let ids: Vec<&str> = resolved.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["bg-fall"]);
}

#[test]
fn store_view_flags_agree_with_reads() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);
    ledger.add_points(15, "seed").unwrap();
    ledger.purchase("bg-spring").unwrap();

    // December: seasonal four plus the two winter event items.
    let view = ledger.store_view(11).unwrap();
    assert_eq!(view.balance, 5);
    assert_eq!(view.entries.len(), 6);

    let spring = view
        .entries
        .iter()
        .find(|e| e.item.id == "bg-spring")
        .unwrap();
    assert!(spring.owned);
    assert!(spring.applied);

    let snowy = view
        .entries
        .iter()
        .find(|e| e.item.id == "bg-snowy")
        .unwrap();
    assert!(!snowy.owned);
    assert!(!snowy.applied);
    assert!(!snowy.affordable); // priced 20, balance 5

    let fall = view
        .entries
        .iter()
        .find(|e| e.item.id == "bg-fall")
        .unwrap();
    assert!(!fall.owned);
    assert!(!fall.affordable); // priced 10, balance 5
}

#[test]
fn record_sort_advances_counter_and_stage() {
    let store = MemoryStore::default();
    let (ledger, _) = new_ledger(&store);

    assert_eq!(ledger.sort_count().unwrap(), 0);
    assert_eq!(ledger.island_stage().unwrap().index(), 0);
    for expected in 1..=5 {
        assert_eq!(ledger.record_sort().unwrap(), expected);
    }
    assert_eq!(ledger.island_stage().unwrap().index(), 1);
    assert_eq!(store.read(KEY_SORT_COUNT).unwrap().as_deref(), Some("5"));
}

#[test]
fn corrupt_persisted_values_fall_back_to_defaults() {
    let store = MemoryStore::default();
    store.write(KEY_POINTS, "12.7 points").unwrap();
    store.write(KEY_PURCHASED, "not json").unwrap();
    store.write(KEY_SORT_COUNT, "-3").unwrap();
    let (ledger, _) = new_ledger(&store);

    assert_eq!(ledger.balance().unwrap(), 0);
    assert!(ledger.owned_items().unwrap().is_empty());
    assert_eq!(ledger.sort_count().unwrap(), 0);
    // A corrupt counter starts over rather than erroring.
    assert_eq!(ledger.record_sort().unwrap(), 1);
}
