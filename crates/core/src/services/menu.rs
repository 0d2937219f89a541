//! Menu derivation, synchronization passes, and click routing.
//!
//! The menu is a pure function of the location list and the map-search flag.
//! A pass reads both values, clears the host menu, and recreates every entry.
//! Clicks resolve their identifier against a fresh read of the store; nothing
//! from a previous pass is trusted.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::db::{LocationStore, StoreError};
use crate::model::{
    Location, MenuEntry, MenuItemId, MAP_SEARCH_ID, NO_LOCATIONS_ID, PARENT_ID,
};
use crate::services::hosts::{HostError, MenuHost, Navigator};
use crate::services::urls::{directions_url, search_url};

pub const PARENT_LABEL: &str = "Get Directions From";
pub const NO_LOCATIONS_LABEL: &str = "No locations saved (click to add)";
pub const MAP_SEARCH_LABEL: &str = "Search on Map";

/// Error aborting a synchronization pass. The menu keeps whatever state the
/// host had when the error occurred.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to read menu state: {0}")]
    Store(#[from] StoreError),
    #[error("Menu host rejected update: {0}")]
    Host(#[from] HostError),
}

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("Failed to read locations: {0}")]
    Store(#[from] StoreError),
    #[error("Navigation failed: {0}")]
    Host(#[from] HostError),
}

/// Why an activation produced no side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The action needs selected text and there was none.
    EmptySelection,
    /// The list shrank since the menu was built.
    StaleIndex(usize),
    /// Identifier not produced by `render`.
    UnrecognizedId,
}

/// Outcome of routing one menu click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    OpenedSettings,
    OpenedTab(String),
    Ignored(IgnoreReason),
}

/// Derive the menu for the given state.
pub fn render(locations: &[Location], map_search: bool) -> Vec<MenuEntry> {
    let total = locations.len() + usize::from(map_search);

    match (total, locations.first()) {
        (0, _) => vec![
            MenuEntry::top_level(PARENT_ID, PARENT_LABEL),
            MenuEntry::child(NO_LOCATIONS_ID, NO_LOCATIONS_LABEL),
        ],
        (1, Some(only)) => vec![MenuEntry::top_level(
            MenuItemId::Location(0).to_string(),
            format!("Directions from {}", only.name),
        )],
        (1, None) => vec![MenuEntry::top_level(MAP_SEARCH_ID, MAP_SEARCH_LABEL)],
        _ => {
            let mut entries = Vec::with_capacity(total + 1);
            entries.push(MenuEntry::top_level(PARENT_ID, PARENT_LABEL));
            for (index, location) in locations.iter().enumerate() {
                entries.push(MenuEntry::child(
                    MenuItemId::Location(index).to_string(),
                    location.name.clone(),
                ));
            }
            if map_search {
                entries.push(MenuEntry::child(MAP_SEARCH_ID, MAP_SEARCH_LABEL));
            }
            entries
        }
    }
}

/// Keeps a `MenuHost` equal to `render(store state)` and routes clicks.
pub struct MenuSynchronizer {
    store: LocationStore,
    menu: Arc<dyn MenuHost>,
    navigator: Arc<dyn Navigator>,
}

impl MenuSynchronizer {
    pub fn new(store: LocationStore, menu: Arc<dyn MenuHost>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, menu, navigator }
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Run one full remove-all-then-rebuild pass and return the entries created.
    ///
    /// State is read before the host is touched, so a store failure leaves the
    /// previous menu in place.
    pub fn synchronize(&self) -> Result<Vec<MenuEntry>, SyncError> {
        let locations = self.store.get_locations()?;
        let map_search = self.store.get_map_search_enabled()?;
        let entries = render(&locations, map_search);

        self.menu.remove_all()?;
        for entry in &entries {
            self.menu.create(entry)?;
        }
        tracing::info!(
            locations = locations.len(),
            map_search,
            entries = entries.len(),
            "menu synchronized"
        );
        Ok(entries)
    }

    /// Route a click on menu entry `id` with the page's selected text.
    pub fn on_menu_activated(
        &self,
        id: &str,
        selection: Option<&str>,
    ) -> Result<Activation, ActivationError> {
        // Only absent or zero-length text counts as no selection; trimming
        // happens when the URL is built.
        let selection = selection.filter(|s| !s.is_empty());

        let outcome = match MenuItemId::parse(id) {
            Some(MenuItemId::NoLocations) => {
                self.navigator.open_settings()?;
                Activation::OpenedSettings
            }
            Some(MenuItemId::MapSearch) => match selection {
                Some(text) => self.open_tab(search_url(text))?,
                None => Activation::Ignored(IgnoreReason::EmptySelection),
            },
            Some(MenuItemId::Location(index)) => {
                let locations = self.store.get_locations()?;
                match (locations.get(index), selection) {
                    (None, _) => Activation::Ignored(IgnoreReason::StaleIndex(index)),
                    (Some(_), None) => Activation::Ignored(IgnoreReason::EmptySelection),
                    (Some(origin), Some(text)) => {
                        self.open_tab(directions_url(&origin.address, text))?
                    }
                }
            }
            Some(MenuItemId::Parent) | None => Activation::Ignored(IgnoreReason::UnrecognizedId),
        };

        if let Activation::Ignored(reason) = &outcome {
            tracing::debug!(id, ?reason, "menu activation ignored");
        }
        Ok(outcome)
    }

    /// Toolbar button: always opens the settings surface.
    pub fn on_toolbar_action(&self) -> Result<(), HostError> {
        self.navigator.open_settings()
    }

    fn open_tab(&self, url: String) -> Result<Activation, HostError> {
        self.navigator.open_in_new_tab(&url)?;
        Ok(Activation::OpenedTab(url))
    }
}

impl std::fmt::Debug for MenuSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuSynchronizer").field("store", &self.store).finish_non_exhaustive()
    }
}
