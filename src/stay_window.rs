// Default stay windows

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Booking an offer defaults to a stay a month out
pub const OFFER_LEAD_DAYS: u64 = 30;
pub const OFFER_STAY_NIGHTS: u64 = 3;

// The search form defaults to a stay starting today, three nights long
pub const SEARCH_STAY_NIGHTS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayWindow {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayWindow {
    pub fn nights(&self) -> i64 {
        self.check_out.signed_duration_since(self.check_in).num_days()
    }
}

// Saturates at the calendar limit instead of failing
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Default check-in/check-out for a newly selected offer.
///
/// Check-in is `reference + 30` days and check-out is three nights after
/// that check-in.
///
/// Within 33 days of `NaiveDate::MAX` the additions saturate, so check-in
/// and check-out can both clamp to `NaiveDate::MAX` and the window is empty.
pub fn derive_default_window(reference: NaiveDate) -> StayWindow {
    let check_in = add_days(reference, OFFER_LEAD_DAYS);
    let check_out = add_days(check_in, OFFER_STAY_NIGHTS);
    StayWindow {
        check_in,
        check_out,
    }
}

pub fn default_window() -> StayWindow {
    derive_default_window(today())
}

pub fn default_search_window(reference: NaiveDate) -> StayWindow {
    StayWindow {
        check_in: reference,
        check_out: add_days(reference, SEARCH_STAY_NIGHTS),
    }
}

// Date inputs are filled from the UTC calendar day
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
