//! Mapping-service URL templates.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1";
const SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1";

/// URI-component encoding: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` as a single URI component (space becomes `%20`).
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Directions from a saved address to the (trimmed) selection.
pub fn directions_url(origin_address: &str, destination: &str) -> String {
    format!(
        "{DIRECTIONS_BASE}&origin={}&destination={}",
        encode_component(origin_address),
        encode_component(destination.trim())
    )
}

/// Map search for the (trimmed) selection.
pub fn search_url(query: &str) -> String {
    format!("{SEARCH_BASE}&query={}", encode_component(query.trim()))
}
