// Hotel listings

use serde_json::Value;
use std::sync::Arc;

use crate::entities::{from_record, from_records, Hotel, RecordId};
use crate::notify::Notifier;
use crate::record_store::{
    CreateParams, FetchParams, Filter, FilterOperator, GroupOperator, OrderBy, RecordStore,
    StoreError, WhereGroup,
};

pub const HOTEL_TABLE: &str = "hotel";

pub const HOTEL_FIELDS: &[&str] = &[
    "Id", "Name", "location", "price", "rating", "imageUrl", "amenities",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelFilters {
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl HotelFilters {
    pub fn location(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Default::default()
        }
    }

    // Best rated first; the price range goes in one AND group
    pub fn to_params(&self) -> FetchParams {
        let mut params = FetchParams::with_fields(HOTEL_FIELDS);
        params.order_by.push(OrderBy::desc("rating"));

        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            params
                .filters
                .push(Filter::new("location", FilterOperator::Contains, location));
        }

        let mut price_filters = Vec::new();
        if let Some(min) = self.min_price {
            price_filters.push(Filter::new(
                "price",
                FilterOperator::GreaterThanOrEqual,
                min,
            ));
        }
        if let Some(max) = self.max_price {
            price_filters.push(Filter::new("price", FilterOperator::LessThanOrEqual, max));
        }
        if !price_filters.is_empty() {
            params.where_groups.push(WhereGroup {
                operator: GroupOperator::And,
                conditions: price_filters,
            });
        }

        params
    }
}

pub struct HotelService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl HotelService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn fetch_hotels(&self, filters: &HotelFilters) -> Result<Vec<Hotel>, StoreError> {
        let result: Result<Vec<Hotel>, StoreError> = async {
            let response = self
                .store
                .fetch_records(HOTEL_TABLE, filters.to_params())
                .await?;
            from_records(HOTEL_TABLE, response.data)
        }
        .await;

        if let Err(e) = &result {
            tracing::error!(table = HOTEL_TABLE, error = %e, "failed to fetch hotels");
            self.notifier
                .error("Failed to load hotels. Please try again.");
        }
        result
    }

    pub async fn get_hotel_by_id(&self, id: RecordId) -> Result<Hotel, StoreError> {
        let fields: Vec<String> = HOTEL_FIELDS.iter().map(|f| f.to_string()).collect();
        let response = match self.store.get_record_by_id(HOTEL_TABLE, id, &fields).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(table = HOTEL_TABLE, record_id = id, error = %e, "failed to fetch hotel");
                self.notifier
                    .error("Failed to load hotel details. Please try again.");
                return Err(e);
            }
        };

        let Some(record) = response.data else {
            self.notifier.error("Hotel not found");
            return Err(StoreError::NotFound {
                table: HOTEL_TABLE.to_string(),
                id,
            });
        };

        from_record(HOTEL_TABLE, record).map_err(|e| {
            tracing::error!(table = HOTEL_TABLE, record_id = id, error = %e, "unreadable hotel record");
            self.notifier
                .error("Failed to load hotel details. Please try again.");
            e
        })
    }

    pub async fn create_hotel(&self, hotel: Value) -> Result<Hotel, StoreError> {
        let Value::Object(record) = hotel else {
            return Err(StoreError::InvalidRecord {
                table: HOTEL_TABLE.to_string(),
                message: "hotel must be an object".to_string(),
            });
        };

        let params = CreateParams {
            records: vec![record],
        };
        let created = match self.store.create_record(HOTEL_TABLE, params).await {
            Ok(response) => response.into_first(),
            Err(e) => {
                tracing::error!(table = HOTEL_TABLE, error = %e, "failed to create hotel");
                self.notifier
                    .error("Failed to create hotel. Please try again.");
                return Err(e);
            }
        };

        let Some(record) = created else {
            self.notifier.error("Failed to create hotel");
            return Err(StoreError::Rejected {
                table: HOTEL_TABLE.to_string(),
            });
        };

        match from_record::<Hotel>(HOTEL_TABLE, record) {
            Ok(hotel) => {
                self.notifier.success("Hotel created successfully");
                Ok(hotel)
            }
            Err(e) => {
                tracing::error!(table = HOTEL_TABLE, error = %e, "unreadable created hotel");
                self.notifier
                    .error("Hotel was created but could not be loaded. Please refresh.");
                Err(e)
            }
        }
    }
}
