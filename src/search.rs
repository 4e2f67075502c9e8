// Search and booking request validation
// Runs before any store call is made; nothing here touches the network

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::RecordId;
use crate::stay_window::default_search_window;

// Validation failures, one user-facing message each
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a destination")]
    MissingDestination,

    #[error("Check-out date must be after check-in date")]
    InvalidDateOrder,

    #[error("Check-in date is required")]
    MissingCheckIn,

    #[error("Check-out date is required")]
    MissingCheckOut,

    #[error("Invalid date: {0}")]
    MalformedDate(String),
}

// What the user typed into the search bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

impl SearchCriteria {
    /// Fresh search form: no destination, today to today + 3 nights, 2 guests.
    pub fn with_defaults(today: NaiveDate) -> Self {
        let window = default_search_window(today);
        Self {
            destination: String::new(),
            check_in: window.check_in,
            check_out: window.check_out,
            guests: 2,
        }
    }

    pub fn nights(&self) -> i64 {
        whole_days_between(self.check_in, self.check_out)
    }
}

// Criteria that passed `validate`. Only constructed there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCriteria(SearchCriteria);

impl ValidatedCriteria {
    pub fn criteria(&self) -> &SearchCriteria {
        &self.0
    }

    pub fn into_inner(self) -> SearchCriteria {
        self.0
    }
}

impl std::ops::Deref for ValidatedCriteria {
    type Target = SearchCriteria;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Signed number of whole days from `from` to `to`
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

fn check_date_order(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), ValidationError> {
    if whole_days_between(check_in, check_out) < 1 {
        return Err(ValidationError::InvalidDateOrder);
    }
    Ok(())
}

/// Validate a search before it is sent anywhere.
///
/// The destination rule is checked before the date rule, so a request that
/// breaks both reports `MissingDestination`. The destination text is kept
/// verbatim; guest count is not range-checked.
pub fn validate(criteria: SearchCriteria) -> Result<ValidatedCriteria, ValidationError> {
    if criteria.destination.trim().is_empty() {
        return Err(ValidationError::MissingDestination);
    }
    check_date_order(criteria.check_in, criteria.check_out)?;
    Ok(ValidatedCriteria(criteria))
}

// A booking request ready to hand to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub offer_id: RecordId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
    pub special_requests: Option<String>,
}

impl BookingRequest {
    pub fn nights(&self) -> i64 {
        whole_days_between(self.check_in, self.check_out)
    }
}

// Guest and room ranges are enforced by the form widgets, not here
pub fn validate_booking(request: &BookingRequest) -> Result<(), ValidationError> {
    check_date_order(request.check_in, request.check_out)
}

// Booking form as the date inputs deliver it: ISO dates, possibly blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub rooms: u32,
    pub special_requests: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            check_in: String::new(),
            check_out: String::new(),
            guests: 2,
            rooms: 1,
            special_requests: String::new(),
        }
    }
}

fn parse_form_date(raw: &str, missing: ValidationError) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(missing);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::MalformedDate(raw.to_string()))
}

impl BookingForm {
    /// Parse and validate the form into a request for `offer_id`.
    pub fn into_request(self, offer_id: RecordId) -> Result<BookingRequest, ValidationError> {
        let check_in = parse_form_date(&self.check_in, ValidationError::MissingCheckIn)?;
        let check_out = parse_form_date(&self.check_out, ValidationError::MissingCheckOut)?;

        let special_requests = if self.special_requests.trim().is_empty() {
            None
        } else {
            Some(self.special_requests)
        };

        let request = BookingRequest {
            offer_id,
            check_in,
            check_out,
            guests: self.guests,
            rooms: self.rooms,
            special_requests,
        };
        validate_booking(&request)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use tokio_test::{assert_err, assert_ok};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn criteria(destination: &str, check_in: NaiveDate, check_out: NaiveDate) -> SearchCriteria {
        SearchCriteria {
            destination: destination.to_string(),
            check_in,
            check_out,
            guests: 2,
        }
    }

    #[test_case(""; "#1 empty")]
    #[test_case("   "; "#2 spaces")]
    #[test_case("\t\n"; "#3 tabs and newlines")]
    fn test_blank_destination_rejected(destination: &str) {
        let result = validate(criteria(destination, date(2024, 1, 10), date(2024, 1, 12)));
        assert_eq!(result, Err(ValidationError::MissingDestination));
    }

    #[test]
    fn test_destination_checked_before_dates() {
        // Both rules broken; destination wins
        let result = validate(criteria("", date(2024, 1, 12), date(2024, 1, 10)));
        assert_eq!(result, Err(ValidationError::MissingDestination));
    }

    #[test_case(date(2024, 1, 12), date(2024, 1, 10); "#1 reversed")]
    #[test_case(date(2024, 1, 10), date(2024, 1, 10); "#2 same day")]
    #[test_case(date(2024, 12, 31), date(2024, 1, 1); "#3 a year back")]
    fn test_bad_date_order_rejected(check_in: NaiveDate, check_out: NaiveDate) {
        let result = validate(criteria("Paris", check_in, check_out));
        assert_eq!(result, Err(ValidationError::InvalidDateOrder));
    }

    #[test_case(date(2024, 1, 10), date(2024, 1, 11); "#1 one night")]
    #[test_case(date(2024, 1, 31), date(2024, 2, 1); "#2 across a month")]
    #[test_case(date(2024, 12, 31), date(2025, 1, 3); "#3 across a year")]
    #[test_case(date(2024, 2, 28), date(2024, 3, 1); "#4 leap day inside")]
    fn test_valid_criteria_returned_unchanged(check_in: NaiveDate, check_out: NaiveDate) {
        let input = criteria("  New York  ", check_in, check_out);
        let validated = assert_ok!(validate(input.clone()));
        assert_eq!(validated.criteria(), &input);
        assert_eq!(validated.destination, "  New York  ");
    }

    #[test]
    fn test_guest_count_not_range_checked() {
        let mut input = criteria("Lisbon", date(2024, 5, 1), date(2024, 5, 4));
        input.guests = 40;
        assert_ok!(validate(input.clone()));
        input.guests = 0;
        assert_ok!(validate(input));
    }

    #[test]
    fn test_search_defaults() {
        let today = date(2024, 3, 30);
        let fresh = SearchCriteria::with_defaults(today);
        assert_eq!(fresh.destination, "");
        assert_eq!(fresh.check_in, today);
        assert_eq!(fresh.check_out, date(2024, 4, 2));
        assert_eq!(fresh.guests, 2);
        assert_eq!(fresh.nights(), 3);

        // Untouched defaults still need a destination
        assert_eq!(validate(fresh), Err(ValidationError::MissingDestination));
    }

    #[test]
    fn test_booking_form_into_request() {
        let form = BookingForm {
            check_in: "2024-06-01".to_string(),
            check_out: "2024-06-05".to_string(),
            guests: 3,
            rooms: 2,
            special_requests: "Late arrival".to_string(),
        };

        let request = assert_ok!(form.into_request(11));
        assert_eq!(request.offer_id, 11);
        assert_eq!(request.check_in, date(2024, 6, 1));
        assert_eq!(request.check_out, date(2024, 6, 5));
        assert_eq!(request.nights(), 4);
        assert_eq!(request.special_requests.as_deref(), Some("Late arrival"));
    }

    #[test]
    fn test_booking_form_blank_requests_become_none() {
        let form = BookingForm {
            check_in: "2024-06-01".to_string(),
            check_out: "2024-06-02".to_string(),
            special_requests: "  ".to_string(),
            ..Default::default()
        };
        let request = assert_ok!(form.into_request(1));
        assert_eq!(request.special_requests, None);
        assert_eq!(request.guests, 2);
        assert_eq!(request.rooms, 1);
    }

    #[test_case("", "2024-06-02", ValidationError::MissingCheckIn; "#1 no check-in")]
    #[test_case("2024-06-01", " ", ValidationError::MissingCheckOut; "#2 no check-out")]
    #[test_case("06/01/2024", "2024-06-02", ValidationError::MalformedDate("06/01/2024".to_string()); "#3 wrong format")]
    #[test_case("2024-02-30", "2024-03-02", ValidationError::MalformedDate("2024-02-30".to_string()); "#4 impossible day")]
    #[test_case("2024-06-02", "2024-06-02", ValidationError::InvalidDateOrder; "#5 same day")]
    #[test_case("2024-06-05", "2024-06-01", ValidationError::InvalidDateOrder; "#6 reversed")]
    fn test_booking_form_errors(check_in: &str, check_out: &str, expected: ValidationError) {
        let form = BookingForm {
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            ..Default::default()
        };
        let err = assert_err!(form.into_request(3));
        assert_eq!(err, expected);
    }

    #[test]
    fn test_booking_ranges_are_not_enforced() {
        let request = BookingRequest {
            offer_id: 5,
            check_in: date(2024, 8, 1),
            check_out: date(2024, 8, 2),
            guests: 12,
            rooms: 9,
            special_requests: None,
        };
        assert_ok!(validate_booking(&request));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingDestination.to_string(),
            "Please enter a destination"
        );
        assert_eq!(
            ValidationError::InvalidDateOrder.to_string(),
            "Check-out date must be after check-in date"
        );
    }
}
