//! directions-core
//!
//! Core library for quick-directions: a small ordered list of saved locations
//! turned into a text-selection context menu that opens driving directions
//! (or a map search) for the selected text.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends. Host environments plug in through the `KeyValueStore`,
//! `MenuHost`, and `Navigator` traits.

pub mod db;
pub mod model;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
