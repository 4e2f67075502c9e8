// Stay finder: hotel search, deals, favorites and bookings over a hosted record store

pub mod booking_flow;
pub mod bookings;
pub mod config;
pub mod deals;
pub mod entities;
pub mod favorites;
pub mod hotels;
pub mod http_store;
pub mod notify;
pub mod record_store;
pub mod search;
pub mod search_flow;
pub mod search_log;
pub mod state;
pub mod stay_window;

// Re-export key types for convenience
pub use booking_flow::{BookingDraft, BookingFlow, BookingFlowError};
pub use bookings::BookingService;
pub use config::{ConfigError, StoreConfig};
pub use deals::{DealFilters, DealService};
pub use entities::{Booking, Deal, Favoritable, Hotel, Identified, RecordId, SearchLogEntry};
pub use favorites::{FavoriteState, FavoriteToggleCoordinator, ToggleError};
pub use hotels::{HotelFilters, HotelService};
pub use http_store::HttpRecordStore;
pub use notify::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use record_store::{Record, RecordStore, StoreError};
pub use search::{
    validate, validate_booking, BookingForm, BookingRequest, SearchCriteria, ValidatedCriteria,
    ValidationError,
};
pub use search_flow::{SearchFlow, SearchFlowError};
pub use search_log::SearchLog;
pub use state::{AppState, ListState};
pub use stay_window::{derive_default_window, default_search_window, StayWindow};
