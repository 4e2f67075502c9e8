// Booking an offer: pick a deal, pre-fill the stay, submit the form

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use crate::bookings::BookingService;
use crate::entities::{Booking, Deal};
use crate::notify::Notifier;
use crate::record_store::StoreError;
use crate::search::{BookingForm, ValidationError};
use crate::stay_window::{derive_default_window, StayWindow};

#[derive(Error, Debug)]
pub enum BookingFlowError {
    #[error("No offer selected")]
    NoOfferSelected,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// An offer picked for booking together with its form
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub offer: Deal,
    pub window: StayWindow,
    pub form: BookingForm,
}

impl BookingDraft {
    /// Pre-fill the form with the default stay derived from `today`.
    pub fn new(offer: Deal, today: NaiveDate) -> Self {
        let window = derive_default_window(today);
        let form = BookingForm {
            check_in: window.check_in.format("%Y-%m-%d").to_string(),
            check_out: window.check_out.format("%Y-%m-%d").to_string(),
            ..Default::default()
        };
        Self {
            offer,
            window,
            form,
        }
    }
}

pub struct BookingFlow {
    bookings: BookingService,
    notifier: Arc<dyn Notifier>,
    draft: Option<BookingDraft>,
}

impl BookingFlow {
    pub fn new(bookings: BookingService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            bookings,
            notifier,
            draft: None,
        }
    }

    // The window is derived once here, not on every edit
    pub fn select_offer(&mut self, offer: Deal, today: NaiveDate) -> &mut BookingDraft {
        self.draft.insert(BookingDraft::new(offer, today))
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut BookingForm> {
        self.draft.as_mut().map(|d| &mut d.form)
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Validate and submit the current draft.
    ///
    /// The draft is cleared once the store has accepted the booking, even if
    /// its answer could not be read back; resubmitting would book twice. On
    /// any other failure it stays so the user can correct it and retry.
    pub async fn submit(&mut self) -> Result<Booking, BookingFlowError> {
        let Some(draft) = self.draft.as_ref() else {
            return Err(BookingFlowError::NoOfferSelected);
        };

        let request = match draft.form.clone().into_request(draft.offer.id) {
            Ok(request) => request,
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e.into());
            }
        };

        match self.bookings.create_booking(&request).await {
            Ok(booking) => {
                self.draft = None;
                Ok(booking)
            }
            Err(e @ StoreError::InvalidRecord { .. }) => {
                self.draft = None;
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
