//! Host date source
//!
//! The core ledger never reads a clock; this module derives "today" from
//! `js_sys::Date` in the browser's local time zone, matching the calendar
//! dates earlier releases stamped into existing profiles.

use chrono::NaiveDate;

/// Today's local calendar date.
#[must_use]
pub fn today_local() -> NaiveDate {
    let now = js_sys::Date::new_0();
    date_from_parts(now.get_full_year(), now.get_month(), now.get_date())
}

/// Current local month, 0-indexed (January = 0), as the seasonal
/// availability bands expect.
#[must_use]
pub fn current_month0() -> u32 {
    js_sys::Date::new_0().get_month()
}

fn date_from_parts(year: u32, month0: u32, day: u32) -> NaiveDate {
    let parsed = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month0 + 1, day));
    parsed.unwrap_or_else(|| {
        log::warn!("browser reported out-of-range date {year}-{month0}-{day}, using epoch");
        NaiveDate::default()
    })
}
