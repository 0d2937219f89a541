use std::fs;
use std::path::Path;

use directions_core::model::MenuEntry;
use quick_directions::commands::{format_menu, parse_switch};
use quick_directions::{canonicalize_or_current, infer_profile_name};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_keeps_absolute_paths() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().expect("utf8")).expect("canonicalize");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn infer_profile_name_uses_last_path_component() {
    assert_eq!(infer_profile_name(Path::new("/home/me/commute")), "commute");
}

#[test]
fn infer_profile_name_falls_back_when_missing() {
    assert_eq!(infer_profile_name(Path::new("/")), "default-profile");
}

#[test]
fn parse_switch_accepts_common_spellings() {
    for value in ["on", "ON", "true", "yes", "1"] {
        assert!(parse_switch(value).expect("parse"), "{value}");
    }
    for value in ["off", "false", "no", "0"] {
        assert!(!parse_switch(value).expect("parse"), "{value}");
    }
    let err = parse_switch("maybe").unwrap_err();
    assert!(err.to_string().contains("Invalid switch value"));
}

#[test]
fn format_menu_indents_children() {
    let lines = format_menu(&[
        MenuEntry::top_level("quick-directions-parent", "Get Directions From"),
        MenuEntry::child("location-0", "Home"),
    ]);
    assert_eq!(
        lines,
        vec!["Get Directions From [quick-directions-parent]", "  Home [location-0]"]
    );
}
