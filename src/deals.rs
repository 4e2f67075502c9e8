// Deal listings and favorites

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::entities::{from_record, from_records, Deal, RecordId};
use crate::favorites::{FavoriteToggleCoordinator, ToggleError};
use crate::notify::Notifier;
use crate::record_store::{
    CreateParams, FetchParams, Filter, FilterOperator, OrderBy, RecordStore, StoreError,
};
use crate::state::ListState;

pub const DEAL_TABLE: &str = "deal";

pub const DEAL_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "hotel",
    "location",
    "originalPrice",
    "discountedPrice",
    "discount",
    "amenities",
    "image",
    "dateRange",
    "favorite",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealFilters {
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub favorites_only: bool,
}

impl DealFilters {
    // Biggest discount first
    pub fn to_params(&self) -> FetchParams {
        let mut params = FetchParams::with_fields(DEAL_FIELDS);
        params.order_by.push(OrderBy::desc("discount"));

        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            params
                .filters
                .push(Filter::new("location", FilterOperator::Contains, location));
        }
        if let Some(max) = self.max_price {
            params.filters.push(Filter::new(
                "discountedPrice",
                FilterOperator::LessThanOrEqual,
                max,
            ));
        }
        if self.favorites_only {
            params
                .filters
                .push(Filter::new("favorite", FilterOperator::Equals, true));
        }
        params
    }
}

pub struct DealService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    favorites: FavoriteToggleCoordinator,
}

impl DealService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        let favorites = FavoriteToggleCoordinator::new(store.clone(), notifier.clone(), DEAL_TABLE);
        Self {
            store,
            notifier,
            favorites,
        }
    }

    pub fn favorites(&self) -> &FavoriteToggleCoordinator {
        &self.favorites
    }

    pub async fn fetch_deals(&self, filters: &DealFilters) -> Result<Vec<Deal>, StoreError> {
        let response = match self
            .store
            .fetch_records(DEAL_TABLE, filters.to_params())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(table = DEAL_TABLE, error = %e, "error fetching deals");
                self.notifier.error("Failed to load deals. Please try again.");
                return Err(e);
            }
        };

        from_records(DEAL_TABLE, response.data).map_err(|e| {
            tracing::error!(table = DEAL_TABLE, error = %e, "unreadable deal records");
            self.notifier.error("Failed to load deals. Please try again.");
            e
        })
    }

    pub async fn get_deal_by_id(&self, id: RecordId) -> Result<Deal, StoreError> {
        let fields: Vec<String> = DEAL_FIELDS.iter().map(|f| f.to_string()).collect();
        let result = self.store.get_record_by_id(DEAL_TABLE, id, &fields).await;

        match result {
            Ok(response) => match response.data {
                Some(record) => from_record(DEAL_TABLE, record).map_err(|e| {
                    tracing::error!(table = DEAL_TABLE, record_id = id, error = %e, "unreadable deal record");
                    self.notifier
                        .error("Failed to load deal details. Please try again.");
                    e
                }),
                None => {
                    self.notifier.error("Deal not found");
                    Err(StoreError::NotFound {
                        table: DEAL_TABLE.to_string(),
                        id,
                    })
                }
            },
            Err(e) => {
                tracing::error!(table = DEAL_TABLE, record_id = id, error = %e, "error fetching deal");
                self.notifier
                    .error("Failed to load deal details. Please try again.");
                Err(e)
            }
        }
    }

    pub async fn create_deal(&self, deal: Value) -> Result<Deal, StoreError> {
        let Value::Object(record) = deal else {
            return Err(StoreError::InvalidRecord {
                table: DEAL_TABLE.to_string(),
                message: "deal must be an object".to_string(),
            });
        };

        let response = self
            .store
            .create_record(
                DEAL_TABLE,
                CreateParams {
                    records: vec![record],
                },
            )
            .await
            .map_err(|e| {
                tracing::error!(table = DEAL_TABLE, error = %e, "error creating deal");
                self.notifier.error("Failed to create deal. Please try again.");
                e
            })?;

        match response.into_first() {
            Some(record) => match from_record::<Deal>(DEAL_TABLE, record) {
                Ok(deal) => {
                    self.notifier.success("Deal created successfully");
                    Ok(deal)
                }
                Err(e) => {
                    tracing::error!(table = DEAL_TABLE, error = %e, "unreadable created deal");
                    self.notifier
                        .error("Deal was created but could not be loaded. Please refresh.");
                    Err(e)
                }
            },
            None => {
                self.notifier.error("Failed to create deal");
                Err(StoreError::Rejected {
                    table: DEAL_TABLE.to_string(),
                })
            }
        }
    }

    pub async fn toggle_favorite(&self, id: RecordId, current: bool) -> Result<bool, ToggleError> {
        self.favorites.toggle_favorite(id, current).await
    }

    pub async fn toggle_listed_favorite(
        &self,
        deals: &Mutex<ListState<Deal>>,
        id: RecordId,
    ) -> Result<bool, ToggleError> {
        self.favorites.toggle_in_list(deals, id).await
    }
}
