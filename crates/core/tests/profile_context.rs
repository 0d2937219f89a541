use directions_core::db::{ProfileConfig, ProfileContext, ProfileLayout, DEFAULT_MAX_LOCATIONS};
use directions_core::model::Location;

#[test]
fn profile_context_loads_config_and_store() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProfileLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();

    let config = ProfileConfig::new("CtxProfile", layout.db_path_relative_string());
    std::fs::write(&layout.config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let ctx = ProfileContext::from_root(temp.path()).expect("context");
    assert_eq!(ctx.config.name, "CtxProfile");
    assert_eq!(ctx.config.namespace, "sync");
    assert!(ctx.db_path.is_file());

    ctx.locations().set_locations(&[Location::new("Home", "1 Main St")]).expect("write");
    assert_eq!(ctx.locations().get_locations().expect("read").len(), 1);
}

#[test]
fn layout_paths_are_under_meta_dir() {
    let layout = ProfileLayout::new("/tmp/profile-root");
    assert!(layout.config_path.ends_with(".quick-directions/profile.json"));
    assert_eq!(layout.db_path_relative_string(), format!(".quick-directions{}store.db", std::path::MAIN_SEPARATOR));
}

#[test]
fn older_config_without_optional_fields_gets_defaults() {
    let json = r#"{ "name": "Old", "config_version": "0.1.0", "db": { "path": "store.db" } }"#;
    let config: ProfileConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(config.namespace, "sync");
    assert_eq!(config.max_locations, DEFAULT_MAX_LOCATIONS);
}

#[test]
fn missing_config_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let err = ProfileContext::from_root(temp.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to read profile config"));
}
