//! Settings-surface operations on the saved location list.
//!
//! Each mutation reads the current list, edits a copy, and writes the whole
//! list back. Concurrent editors are last-write-wins.

use thiserror::Error;

use crate::db::{LocationStore, StoreError, DEFAULT_MAX_LOCATIONS};
use crate::model::Location;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Location {0} must not be empty")]
    EmptyField(&'static str),
    #[error("No location at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Cannot save more than {0} locations")]
    LimitReached(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Editor for the location list and the map-search flag.
#[derive(Debug, Clone)]
pub struct LocationEditor {
    store: LocationStore,
    max_locations: usize,
}

impl LocationEditor {
    pub fn new(store: LocationStore) -> Self {
        Self { store, max_locations: DEFAULT_MAX_LOCATIONS }
    }

    pub fn with_max_locations(mut self, max_locations: usize) -> Self {
        self.max_locations = max_locations;
        self
    }

    pub fn list(&self) -> SettingsResult<Vec<Location>> {
        Ok(self.store.get_locations()?)
    }

    /// Append a location; returns its index.
    pub fn add(&self, name: &str, address: &str) -> SettingsResult<usize> {
        let location = validated(name, address)?;
        let mut locations = self.store.get_locations()?;
        if locations.len() >= self.max_locations {
            return Err(SettingsError::LimitReached(self.max_locations));
        }
        locations.push(location);
        self.store.set_locations(&locations)?;
        Ok(locations.len() - 1)
    }

    pub fn edit(&self, index: usize, name: &str, address: &str) -> SettingsResult<Location> {
        let location = validated(name, address)?;
        let mut locations = self.store.get_locations()?;
        let len = locations.len();
        let slot = locations.get_mut(index).ok_or(SettingsError::IndexOutOfRange { index, len })?;
        *slot = location.clone();
        self.store.set_locations(&locations)?;
        Ok(location)
    }

    /// Delete the location at `index` and return it.
    pub fn remove(&self, index: usize) -> SettingsResult<Location> {
        let mut locations = self.store.get_locations()?;
        check_index(index, locations.len())?;
        let removed = locations.remove(index);
        self.store.set_locations(&locations)?;
        Ok(removed)
    }

    /// Move the location at `from` so it ends up at position `to`.
    pub fn move_to(&self, from: usize, to: usize) -> SettingsResult<()> {
        let mut locations = self.store.get_locations()?;
        check_index(from, locations.len())?;
        check_index(to, locations.len())?;
        if from == to {
            return Ok(());
        }
        let moved = locations.remove(from);
        locations.insert(to, moved);
        self.store.set_locations(&locations)?;
        Ok(())
    }

    pub fn set_map_search(&self, enabled: bool) -> SettingsResult<()> {
        Ok(self.store.set_map_search_enabled(enabled)?)
    }

    pub fn map_search_enabled(&self) -> SettingsResult<bool> {
        Ok(self.store.get_map_search_enabled()?)
    }
}

fn validated(name: &str, address: &str) -> SettingsResult<Location> {
    let name = name.trim();
    let address = address.trim();
    if name.is_empty() {
        return Err(SettingsError::EmptyField("name"));
    }
    if address.is_empty() {
        return Err(SettingsError::EmptyField("address"));
    }
    Ok(Location::new(name, address))
}

fn check_index(index: usize, len: usize) -> SettingsResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(SettingsError::IndexOutOfRange { index, len })
    }
}
