// Favorite toggling with confirmed commits
//
// A toggle is sent to the store first and only written into the local list
// once the store confirms it. While a toggle is in flight the entity is
// `Pending` and further toggles for it are turned away.

use dashmap::DashSet;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use crate::entities::{Favoritable, RecordId};
use crate::notify::Notifier;
use crate::record_store::{RecordPatch, RecordStore, StoreError, UpdateParams};
use crate::state::ListState;

pub const FAVORITE_FIELD: &str = "favorite";

#[derive(Error, Debug)]
pub enum ToggleError {
    #[error("Store rejected the favorite update for {0}")]
    StoreRejected(RecordId),

    #[error("Store unreachable: {0}")]
    StoreUnreachable(#[source] StoreError),

    #[error("A favorite update for {0} is already in progress")]
    AlreadyPending(RecordId),

    #[error("No entity with id {0} in the local list")]
    UnknownEntity(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    Settled(bool),
    // Holds the flag from before the request
    Pending(bool),
}

// Releases the in-flight slot on every exit path, including a dropped future
struct InFlight<'a> {
    set: &'a DashSet<RecordId>,
    id: RecordId,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a DashSet<RecordId>, id: RecordId) -> Option<Self> {
        set.insert(id).then(|| Self { set, id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

pub struct FavoriteToggleCoordinator {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    table: String,
    in_flight: DashSet<RecordId>,
}

impl FavoriteToggleCoordinator {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>, table: &str) -> Self {
        Self {
            store,
            notifier,
            table: table.to_string(),
            in_flight: DashSet::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn is_pending(&self, id: RecordId) -> bool {
        self.in_flight.contains(&id)
    }

    pub fn state_of(&self, id: RecordId, current: bool) -> FavoriteState {
        if self.is_pending(id) {
            FavoriteState::Pending(current)
        } else {
            FavoriteState::Settled(current)
        }
    }

    /// Ask the store to flip `id` from `current` and report the new flag.
    ///
    /// Success notifies "added"/"removed"; any store failure notifies one
    /// error. A toggle for an id that is already pending fails with
    /// `AlreadyPending` without reaching the store.
    pub async fn toggle_favorite(&self, id: RecordId, current: bool) -> Result<bool, ToggleError> {
        let _guard = self.acquire(id)?;
        self.send_toggle(id, current).await
    }

    fn acquire(&self, id: RecordId) -> Result<InFlight<'_>, ToggleError> {
        InFlight::acquire(&self.in_flight, id).ok_or_else(|| {
            tracing::debug!(table = %self.table, record_id = id, "favorite toggle already pending");
            ToggleError::AlreadyPending(id)
        })
    }

    // Caller must hold the in-flight slot for `id`
    async fn send_toggle(&self, id: RecordId, current: bool) -> Result<bool, ToggleError> {
        let requested = !current;
        let params = UpdateParams {
            records: vec![RecordPatch::new(id).set(FAVORITE_FIELD, requested)],
        };

        match self.store.update_record(&self.table, params).await {
            Ok(response) if response.success => {
                if requested {
                    self.notifier.success("Added to favorites");
                } else {
                    self.notifier.info("Removed from favorites");
                }
                tracing::debug!(table = %self.table, record_id = id, favorite = requested, "favorite settled");
                Ok(requested)
            }
            Ok(_) => {
                tracing::warn!(table = %self.table, record_id = id, "store rejected favorite update");
                self.notifier.error("Failed to update favorite status");
                Err(ToggleError::StoreRejected(id))
            }
            Err(e) => {
                tracing::error!(table = %self.table, record_id = id, error = %e, "error toggling favorite status");
                self.notifier
                    .error("Failed to update favorite status. Please try again.");
                Err(ToggleError::StoreUnreachable(e))
            }
        }
    }

    // Toggle an entity held in `list`, committing the new flag only on success.
    // The slot is held from reading the current flag until the list is settled.
    pub async fn toggle_in_list<T: Favoritable>(
        &self,
        list: &Mutex<ListState<T>>,
        id: RecordId,
    ) -> Result<bool, ToggleError> {
        let _guard = self.acquire(id)?;

        let current = list
            .lock()
            .favorite_of(id)
            .ok_or(ToggleError::UnknownEntity(id))?;

        let settled = self.send_toggle(id, current).await?;

        // The list may have been refetched meanwhile; the store already has the new flag
        if !list.lock().settle_favorite(id, settled) {
            tracing::debug!(table = %self.table, record_id = id, "toggled entity no longer listed");
        }
        Ok(settled)
    }
}
