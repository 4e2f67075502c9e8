// Search submission: validate, log the search, fetch matching hotels

use std::sync::Arc;
use thiserror::Error;

use crate::entities::Hotel;
use crate::hotels::{HotelFilters, HotelService};
use crate::notify::Notifier;
use crate::record_store::StoreError;
use crate::search::{validate, SearchCriteria, ValidationError};
use crate::search_log::SearchLog;

#[derive(Error, Debug)]
pub enum SearchFlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SearchFlow {
    hotels: HotelService,
    log: SearchLog,
    notifier: Arc<dyn Notifier>,
}

impl SearchFlow {
    pub fn new(hotels: HotelService, log: SearchLog, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            hotels,
            log,
            notifier,
        }
    }

    /// Run one search. Every outcome produces exactly one notification:
    /// the validation message, the hotel fetch failure, or the result count.
    pub async fn submit(&self, criteria: SearchCriteria) -> Result<Vec<Hotel>, SearchFlowError> {
        let validated = match validate(criteria) {
            Ok(validated) => validated,
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e.into());
            }
        };

        // Not saving the search must not block the results
        if self.log.save_search_request(&validated).await.is_err() {
            tracing::debug!(destination = %validated.destination, "search not logged");
        }

        // The hotel service already notified on failure
        let hotels = self
            .hotels
            .fetch_hotels(&HotelFilters::location(&validated.destination))
            .await?;

        if hotels.is_empty() {
            self.notifier
                .info("No hotels found for your search criteria. Try a different location.");
        } else {
            self.notifier
                .success(&format!("Found {} hotels for your stay!", hotels.len()));
        }
        tracing::info!(
            destination = %validated.destination,
            nights = validated.nights(),
            results = hotels.len(),
            "search completed"
        );
        Ok(hotels)
    }
}
