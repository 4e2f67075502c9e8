// Booking records

use serde_json::{json, Value};
use std::sync::Arc;

use crate::entities::{from_record, from_records, Booking, RecordId};
use crate::notify::Notifier;
use crate::record_store::{
    CreateParams, DeleteParams, Expand, FetchParams, OrderBy, Record, RecordStore, StoreError,
};
use crate::search::BookingRequest;

pub const BOOKING_TABLE: &str = "booking";

pub const BOOKING_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "deal",
    "checkIn",
    "checkOut",
    "guests",
    "rooms",
    "specialRequests",
    "CreatedOn",
];

fn deal_expand() -> Expand {
    Expand {
        name: "deal".to_string(),
        alias: "dealDetails".to_string(),
    }
}

// The booking as it was sent, for a confirmed create whose echo is unreadable
fn booking_from_request(id: RecordId, request: &BookingRequest) -> Booking {
    Booking {
        id,
        name: booking_name(request),
        deal: request.offer_id,
        check_in: request.check_in,
        check_out: request.check_out,
        guests: request.guests,
        rooms: request.rooms,
        special_requests: request.special_requests.clone(),
        created_on: None,
        deal_details: None,
    }
}

// Default record name, e.g. `Booking-12-2024-06-01`
pub fn booking_name(request: &BookingRequest) -> String {
    format!(
        "Booking-{}-{}",
        request.offer_id,
        request.check_in.format("%Y-%m-%d")
    )
}

pub fn booking_record(request: &BookingRequest, name: Option<&str>) -> Record {
    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| booking_name(request));
    let value = json!({
        "Name": name,
        "deal": request.offer_id,
        "checkIn": request.check_in.format("%Y-%m-%d").to_string(),
        "checkOut": request.check_out.format("%Y-%m-%d").to_string(),
        "guests": request.guests,
        "rooms": request.rooms,
        "specialRequests": request.special_requests.clone().unwrap_or_default(),
    });
    match value {
        Value::Object(record) => record,
        _ => Record::new(),
    }
}

pub struct BookingService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl BookingService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    // Newest first, with the deal lookup expanded
    pub async fn fetch_user_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let mut params = FetchParams::with_fields(BOOKING_FIELDS);
        params.order_by.push(OrderBy::desc("CreatedOn"));
        params.expands.push(deal_expand());

        let result = match self.store.fetch_records(BOOKING_TABLE, params).await {
            Ok(response) => from_records(BOOKING_TABLE, response.data),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::error!(table = BOOKING_TABLE, error = %e, "error fetching bookings");
            self.notifier
                .error("Failed to load your bookings. Please try again.");
        }
        result
    }

    pub async fn get_booking_by_id(&self, id: RecordId) -> Result<Booking, StoreError> {
        let fields: Vec<String> = BOOKING_FIELDS.iter().map(|f| f.to_string()).collect();
        let response = self
            .store
            .get_record_by_id(BOOKING_TABLE, id, &fields)
            .await
            .map_err(|e| {
                tracing::error!(table = BOOKING_TABLE, record_id = id, error = %e, "error fetching booking");
                self.notifier
                    .error("Failed to load booking details. Please try again.");
                e
            })?;

        match response.data {
            Some(record) => from_record(BOOKING_TABLE, record).map_err(|e| {
                tracing::error!(table = BOOKING_TABLE, record_id = id, error = %e, "unreadable booking record");
                self.notifier
                    .error("Failed to load booking details. Please try again.");
                e
            }),
            None => {
                self.notifier.error("Booking not found");
                Err(StoreError::NotFound {
                    table: BOOKING_TABLE.to_string(),
                    id,
                })
            }
        }
    }

    /// Create a booking for an already validated request.
    ///
    /// Once the store has confirmed the create the booking exists, so an
    /// unreadable echo falls back to the request data under the new id.
    /// Only an echo without an id is reported as `InvalidRecord`.
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, StoreError> {
        let params = CreateParams {
            records: vec![booking_record(request, None)],
        };

        let response = match self.store.create_record(BOOKING_TABLE, params).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(table = BOOKING_TABLE, offer_id = request.offer_id, error = %e, "error creating booking");
                self.notifier
                    .error("Failed to create booking. Please try again.");
                return Err(e);
            }
        };

        let Some(record) = response.into_first() else {
            self.notifier.error("Failed to create booking");
            return Err(StoreError::Rejected {
                table: BOOKING_TABLE.to_string(),
            });
        };

        let booking: Booking = match from_record(BOOKING_TABLE, record.clone()) {
            Ok(booking) => booking,
            Err(e) => match record.get("Id").and_then(Value::as_i64) {
                Some(id) => {
                    tracing::warn!(table = BOOKING_TABLE, record_id = id, error = %e, "unreadable booking echo, using request data");
                    booking_from_request(id, request)
                }
                None => {
                    tracing::error!(table = BOOKING_TABLE, offer_id = request.offer_id, error = %e, "booking created without a readable id");
                    self.notifier.error(
                        "Your booking was submitted but could not be confirmed. Check your bookings before trying again.",
                    );
                    return Err(e);
                }
            },
        };
        tracing::info!(booking_id = booking.id, offer_id = booking.deal, "booking created");
        self.notifier.success("Booking confirmed successfully!");
        Ok(booking)
    }

    // Cancelling deletes the record
    pub async fn cancel_booking(&self, id: RecordId) -> Result<(), StoreError> {
        let params = DeleteParams {
            record_ids: vec![id],
        };
        match self.store.delete_record(BOOKING_TABLE, params).await {
            Ok(response) if response.success => {
                self.notifier.success("Booking cancelled successfully");
                Ok(())
            }
            Ok(_) => {
                self.notifier.error("Failed to cancel booking");
                Err(StoreError::Rejected {
                    table: BOOKING_TABLE.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(table = BOOKING_TABLE, record_id = id, error = %e, "error cancelling booking");
                self.notifier
                    .error("Failed to cancel booking. Please try again.");
                Err(e)
            }
        }
    }
}
