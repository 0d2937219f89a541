//! Core data model for saved locations and derived context-menu entries.
//!
//! Locations are owned by the store; menu entries are rebuilt from scratch on
//! every synchronization pass and never outlive it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store key holding the ordered location list (JSON array).
pub const LOCATIONS_KEY: &str = "locations";

/// Store key holding the map-search feature flag (JSON boolean).
pub const MAP_SEARCH_KEY: &str = "mapSearchEnabled";

/// Identifier of the flyout parent entry.
pub const PARENT_ID: &str = "quick-directions-parent";

/// Identifier of the placeholder child shown when nothing is configured.
pub const NO_LOCATIONS_ID: &str = "no-locations";

/// Identifier of the map-search entry.
pub const MAP_SEARCH_ID: &str = "map-search";

/// Prefix of positional location identifiers (`location-<index>`).
pub const LOCATION_ID_PREFIX: &str = "location-";

/// A saved, named origin for directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Display label used in the menu.
    pub name: String,
    /// Free-text address handed to the mapping service.
    pub address: String,
}

impl Location {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self { name: name.into(), address: address.into() }
    }
}

/// A node of the context-menu tree produced by one synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub label: String,
}

impl MenuEntry {
    /// Top-level entry (no parent).
    pub fn top_level(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), parent_id: None, label: label.into() }
    }

    /// Entry nested under the flyout parent.
    pub fn child(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), parent_id: Some(PARENT_ID.to_string()), label: label.into() }
    }
}

/// Parsed form of a menu entry identifier.
///
/// `Location` carries a position that is only meaningful against a fresh read
/// of the location list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemId {
    Parent,
    NoLocations,
    MapSearch,
    Location(usize),
}

impl MenuItemId {
    /// Parse a raw identifier. Returns `None` for anything unrecognized,
    /// including `location-` followed by something other than a decimal index.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            PARENT_ID => Some(MenuItemId::Parent),
            NO_LOCATIONS_ID => Some(MenuItemId::NoLocations),
            MAP_SEARCH_ID => Some(MenuItemId::MapSearch),
            other => {
                let digits = other.strip_prefix(LOCATION_ID_PREFIX)?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok().map(MenuItemId::Location)
            }
        }
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItemId::Parent => f.write_str(PARENT_ID),
            MenuItemId::NoLocations => f.write_str(NO_LOCATIONS_ID),
            MenuItemId::MapSearch => f.write_str(MAP_SEARCH_ID),
            MenuItemId::Location(index) => write!(f, "{LOCATION_ID_PREFIX}{index}"),
        }
    }
}
