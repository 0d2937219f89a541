use std::sync::Arc;

use serde_json::Value;

use crate::db::store::{ChangeListener, KeyValueStore, StoreError, StoreResult, SubscriptionId};
use crate::model::{Location, LOCATIONS_KEY, MAP_SEARCH_KEY};

/// Typed access to the location list and the map-search flag.
///
/// This is the only component that knows the store keys and value shapes.
/// Absent keys read as their defaults (`[]` and `false`).
#[derive(Clone)]
pub struct LocationStore {
    store: Arc<dyn KeyValueStore>,
}

impl LocationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    pub fn get_locations(&self) -> StoreResult<Vec<Location>> {
        match self.store.get(LOCATIONS_KEY)? {
            Some(value) => decode(LOCATIONS_KEY, value),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_map_search_enabled(&self) -> StoreResult<bool> {
        match self.store.get(MAP_SEARCH_KEY)? {
            Some(value) => decode(MAP_SEARCH_KEY, value),
            None => Ok(false),
        }
    }

    /// Replace the whole location list.
    pub fn set_locations(&self, locations: &[Location]) -> StoreResult<()> {
        let value = serde_json::to_value(locations)
            .map_err(|source| StoreError::Encode { key: LOCATIONS_KEY.to_string(), source })?;
        self.store.set(&[(LOCATIONS_KEY, value)])
    }

    pub fn set_map_search_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.store.set(&[(MAP_SEARCH_KEY, Value::Bool(enabled))])
    }

    /// Register a listener for every change of the underlying store, including
    /// writes made through this accessor.
    pub fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore").field("namespace", &self.namespace()).finish()
    }
}

fn decode<T: serde::de::DeserializeOwned>(key: &str, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|source| StoreError::Decode { key: key.to_string(), source })
}
