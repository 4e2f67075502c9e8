// Saved search requests
// Logging a search is best effort: failures are traced, never shown.

use serde_json::json;
use std::sync::Arc;

use crate::entities::{from_record, from_records, SearchLogEntry};
use crate::record_store::{
    CreateParams, FetchParams, OrderBy, PagingInfo, RecordStore, StoreError,
};
use crate::search::ValidatedCriteria;

pub const SEARCH_TABLE: &str = "search_request";

pub const SEARCH_FIELDS: &[&str] = &["Id", "location", "checkIn", "checkOut", "guests", "CreatedOn"];

pub const RECENT_SEARCH_LIMIT: usize = 5;

pub fn search_name(criteria: &ValidatedCriteria) -> String {
    format!(
        "{} - {} to {}",
        criteria.destination,
        criteria.check_in.format("%Y-%m-%d"),
        criteria.check_out.format("%Y-%m-%d")
    )
}

pub struct SearchLog {
    store: Arc<dyn RecordStore>,
}

impl SearchLog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn save_search_request(
        &self,
        criteria: &ValidatedCriteria,
    ) -> Result<SearchLogEntry, StoreError> {
        let record = json!({
            "Name": search_name(criteria),
            "location": criteria.destination,
            "checkIn": criteria.check_in.format("%Y-%m-%d").to_string(),
            "checkOut": criteria.check_out.format("%Y-%m-%d").to_string(),
            "guests": criteria.guests,
        });
        let serde_json::Value::Object(record) = record else {
            return Err(StoreError::Other("search record is not an object".to_string()));
        };

        let result = match self
            .store
            .create_record(
                SEARCH_TABLE,
                CreateParams {
                    records: vec![record],
                },
            )
            .await
        {
            Ok(response) => match response.into_first() {
                Some(created) => from_record(SEARCH_TABLE, created),
                None => Err(StoreError::Rejected {
                    table: SEARCH_TABLE.to_string(),
                }),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::warn!(table = SEARCH_TABLE, error = %e, "error saving search request");
        }
        result
    }

    pub async fn recent_searches(&self, limit: usize) -> Result<Vec<SearchLogEntry>, StoreError> {
        let mut params = FetchParams::with_fields(SEARCH_FIELDS);
        params.order_by.push(OrderBy::desc("CreatedOn"));
        params.paging_info = Some(PagingInfo { limit, offset: 0 });

        let response = self
            .store
            .fetch_records(SEARCH_TABLE, params)
            .await
            .map_err(|e| {
                tracing::warn!(table = SEARCH_TABLE, error = %e, "error fetching recent searches");
                e
            })?;
        from_records(SEARCH_TABLE, response.data).map_err(|e| {
            tracing::warn!(table = SEARCH_TABLE, error = %e, "unreadable recent searches");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::mock_store::{MockStore, StoreMode};
    use crate::search::{validate, SearchCriteria};
    use chrono::{Days, NaiveDate};

    fn criteria(destination: &str, offset: u64) -> ValidatedCriteria {
        let check_in = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap() + Days::new(offset);
        validate(SearchCriteria {
            destination: destination.to_string(),
            check_in,
            check_out: check_in + Days::new(2),
            guests: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_search_name() {
        assert_eq!(
            search_name(&criteria("Paris", 0)),
            "Paris - 2024-07-01 to 2024-07-03"
        );
    }

    #[tokio::test]
    async fn test_save_and_recent() {
        let store = Arc::new(MockStore::new());
        let log = SearchLog::new(store.clone());

        for (i, place) in ["Paris", "Rome", "Oslo", "Cairo", "Lima", "Quito", "Hanoi"]
            .iter()
            .enumerate()
        {
            let saved = log.save_search_request(&criteria(place, i as u64)).await.unwrap();
            assert_eq!(saved.location, *place);
        }

        let recent = log.recent_searches(RECENT_SEARCH_LIMIT).await.unwrap();
        assert_eq!(recent.len(), RECENT_SEARCH_LIMIT);
        assert_eq!(recent[0].location, "Hanoi");
        assert_eq!(recent[4].location, "Oslo");
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_not_panicked() {
        let store = Arc::new(MockStore::new());
        store.set_mode(StoreMode::Rejecting);
        let log = SearchLog::new(store.clone());

        let result = log.save_search_request(&criteria("Paris", 0)).await;
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
    }
}
