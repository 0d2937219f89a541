use directions_core::services::{directions_url, encode_component, search_url};

#[test]
fn encodes_like_uri_component() {
    assert_eq!(encode_component("1 Main St"), "1%20Main%20St");
    assert_eq!(encode_component("A-Z_a.z!~*'()"), "A-Z_a.z!~*'()");
    assert_eq!(encode_component("a&b=c/d?e#f+g,h"), "a%26b%3Dc%2Fd%3Fe%23f%2Bg%2Ch");
    assert_eq!(encode_component("Café"), "Caf%C3%A9");
}

#[test]
fn directions_url_matches_template() {
    assert_eq!(
        directions_url("1 Main St", "Central Park"),
        "https://www.google.com/maps/dir/?api=1&origin=1%20Main%20St&destination=Central%20Park"
    );
}

#[test]
fn directions_url_trims_destination_only() {
    assert_eq!(
        directions_url(" 1 Main St", "  Central Park \n"),
        "https://www.google.com/maps/dir/?api=1&origin=%201%20Main%20St&destination=Central%20Park"
    );
}

#[test]
fn search_url_matches_template() {
    assert_eq!(
        search_url(" Eiffel Tower "),
        "https://www.google.com/maps/search/?api=1&query=Eiffel%20Tower"
    );
}
