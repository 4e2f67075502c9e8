// Application state
// Plain list containers handed to the flows explicitly; there is no global
// store. Fetches replace a list wholesale.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::bookings::BookingService;
use crate::deals::{DealFilters, DealService};
use crate::entities::{Booking, Deal, Favoritable, Hotel, Identified, RecordId};
use crate::hotels::{HotelFilters, HotelService};
use crate::record_store::StoreError;

#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    selected: Option<RecordId>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Replaces the list and clears loading/error
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
        if let Some(id) = self.selected {
            if self.get(id).is_none() {
                self.selected = None;
            }
        }
    }

    pub fn select(&mut self, id: Option<RecordId>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.loading = false;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // Applies a store result: items on success, error text on failure
    pub fn apply(&mut self, result: Result<Vec<T>, StoreError>) {
        match result {
            Ok(items) => self.set_items(items),
            Err(e) => self.set_error(e.to_string()),
        }
    }
}

impl<T: Favoritable> ListState<T> {
    pub fn favorite_of(&self, id: RecordId) -> Option<bool> {
        self.get(id).map(|item| item.favorite())
    }

    pub fn favorites(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.favorite())
    }

    // Only the favorite coordinator settles a flag
    pub(crate) fn settle_favorite(&mut self, id: RecordId, favorite: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.set_favorite(favorite);
                true
            }
            None => false,
        }
    }
}

// Session-wide lists, shared between flows
#[derive(Debug, Default)]
pub struct AppState {
    pub hotels: Mutex<ListState<Hotel>>,
    pub deals: Mutex<ListState<Deal>>,
    pub bookings: Mutex<ListState<Booking>>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Load the home page lists. Hotels and deals are fetched concurrently;
    /// a failure in one leaves the other list usable.
    pub async fn load_home(&self, hotels: &HotelService, deals: &DealService) {
        self.hotels.lock().set_loading(true);
        self.deals.lock().set_loading(true);

        let hotel_filters = HotelFilters::default();
        let deal_filters = DealFilters::default();
        let (hotel_result, deal_result) = futures::join!(
            hotels.fetch_hotels(&hotel_filters),
            deals.fetch_deals(&deal_filters)
        );

        self.hotels.lock().apply(hotel_result);
        self.deals.lock().apply(deal_result);
    }

    pub async fn load_bookings(&self, bookings: &BookingService) {
        self.bookings.lock().set_loading(true);
        let result = bookings.fetch_user_bookings().await;
        self.bookings.lock().apply(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::record_store::mock_store::MockStore;
    use serde_json::json;

    fn deal(id: RecordId, favorite: bool) -> Deal {
        Deal {
            id,
            name: format!("Deal {}", id),
            hotel: None,
            location: "Lisbon".to_string(),
            original_price: 200.0,
            discounted_price: 150.0,
            discount: 25.0,
            amenities: vec![],
            image: None,
            date_range: None,
            favorite,
        }
    }

    #[test]
    fn test_set_items_replaces_and_clears() {
        let mut list = ListState::new();
        list.set_loading(true);
        list.set_error("Failed to load deals");
        list.set_items(vec![deal(1, false), deal(2, true)]);

        assert_eq!(list.len(), 2);
        assert!(!list.is_loading());
        assert!(list.error().is_none());
        assert_eq!(list.favorite_of(2), Some(true));
        assert_eq!(list.favorites().count(), 1);

        list.set_items(vec![deal(3, false)]);
        assert!(list.get(1).is_none());
    }

    #[test]
    fn test_selection_dropped_when_item_disappears() {
        let mut list = ListState::new();
        list.set_items(vec![deal(1, false), deal(2, false)]);
        list.select(Some(2));
        assert_eq!(list.selected().map(|d| d.id), Some(2));

        list.set_items(vec![deal(1, false)]);
        assert!(list.selected().is_none());
    }

    #[test]
    fn test_settle_favorite() {
        let mut list = ListState::new();
        list.set_items(vec![deal(7, false)]);
        assert!(list.settle_favorite(7, true));
        assert_eq!(list.favorite_of(7), Some(true));
        assert!(!list.settle_favorite(8, true));
    }

    #[test]
    fn test_apply_error_keeps_previous_items() {
        let mut list = ListState::new();
        list.set_items(vec![deal(1, false)]);
        list.set_loading(true);
        list.apply(Err(StoreError::Network("down".to_string())));
        assert_eq!(list.len(), 1);
        assert!(!list.is_loading());
        assert_eq!(list.error(), Some("Network error: down"));
    }

    #[tokio::test]
    async fn test_load_home_survives_partial_failure() {
        let store = Arc::new(MockStore::new());
        store
            .insert("hotel", json!({"Id": 1, "Name": "Harbor View", "rating": 4.2}))
            .await;
        store
            .insert("deal", json!({"Id": 5, "Name": "Weekend", "discount": 10}))
            .await;
        // Whichever fetch runs first fails
        store.fail_next_requests(1);

        let notifier = Arc::new(RecordingNotifier::new());
        let hotels = HotelService::new(store.clone(), notifier.clone());
        let deals = DealService::new(store.clone(), notifier.clone());

        let state = AppState::new();
        state.load_home(&hotels, &deals).await;

        let hotel_count = state.hotels.lock().len();
        let deal_count = state.deals.lock().len();
        assert_eq!(hotel_count + deal_count, 1);
        let errors =
            state.hotels.lock().error().is_some() as usize + state.deals.lock().error().is_some() as usize;
        assert_eq!(errors, 1);
        assert_eq!(notifier.count(crate::notify::NotificationKind::Error), 1);
    }
}
