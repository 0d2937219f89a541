use serde::{Deserialize, Serialize};

use crate::db::store::SYNC_NAMESPACE;

/// Default cap on saved locations; keeps the flyout usable.
pub const DEFAULT_MAX_LOCATIONS: usize = 50;

/// Location of the profile store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the SQLite store file (typically relative to the profile root).
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializable configuration describing a profile.
///
/// This lives at `.quick-directions/profile.json` in the profile root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Human-friendly profile name.
    pub name: String,
    /// Config format version.
    pub config_version: String,
    /// Store configuration (path is typically relative to the profile root).
    pub db: DbConfig,
    /// Store namespace the menu is synchronized from.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Upper bound on the number of saved locations.
    #[serde(default = "default_max_locations")]
    pub max_locations: usize,
}

impl ProfileConfig {
    /// Create a new profile configuration using the given name and store path.
    pub fn new(name: impl Into<String>, db_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_version: "0.1.0".to_string(),
            db: DbConfig::new(db_path),
            namespace: default_namespace(),
            max_locations: default_max_locations(),
        }
    }
}

fn default_namespace() -> String {
    SYNC_NAMESPACE.to_string()
}

fn default_max_locations() -> usize {
    DEFAULT_MAX_LOCATIONS
}
