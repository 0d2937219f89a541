use std::sync::{Arc, Mutex};

use directions_core::db::{
    KeyValueStore, LocationStore, SqliteStore, StoreChange, StoreError, CURRENT_SCHEMA_VERSION,
};
use directions_core::model::{Location, LOCATIONS_KEY, MAP_SEARCH_KEY};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn values_persist_across_reopen() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("store.db");

    {
        let store = LocationStore::new(Arc::new(SqliteStore::open(&path, "sync").expect("open")));
        store.set_locations(&[Location::new("Home", "1 Main St")]).expect("set");
        store.set_map_search_enabled(true).expect("flag");
    }

    let store = LocationStore::new(Arc::new(SqliteStore::open(&path, "sync").expect("reopen")));
    assert_eq!(store.get_locations().expect("locations"), vec![Location::new("Home", "1 Main St")]);
    assert!(store.get_map_search_enabled().expect("flag"));
}

#[test]
fn namespaces_are_isolated() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("store.db");
    let sync = SqliteStore::open(&path, "sync").expect("open sync");
    let local = SqliteStore::open(&path, "local").expect("open local");

    sync.set(&[(MAP_SEARCH_KEY, json!(true))]).expect("set");
    assert_eq!(local.get(MAP_SEARCH_KEY).expect("get"), None);
    assert_eq!(sync.get(MAP_SEARCH_KEY).expect("get"), Some(json!(true)));
}

#[test]
fn revisions_bump_only_on_change() {
    let store = SqliteStore::open_in_memory("sync").expect("open");
    store.set(&[(MAP_SEARCH_KEY, json!(false))]).expect("first");
    store.set(&[(MAP_SEARCH_KEY, json!(false))]).expect("same");
    store.set(&[(MAP_SEARCH_KEY, json!(true))]).expect("changed");

    let entries = store.entries().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, MAP_SEARCH_KEY);
    assert_eq!(entries[0].revision, 2);
    assert!(entries[0].updated_at.is_some());
}

#[test]
fn multi_key_write_is_one_change() {
    let store = SqliteStore::open_in_memory("sync").expect("open");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(Arc::new(move |c: &StoreChange| sink.lock().unwrap().push(c.clone())));

    store
        .set(&[(LOCATIONS_KEY, json!([])), (MAP_SEARCH_KEY, json!(true))])
        .expect("set both");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![StoreChange::new("sync", [LOCATIONS_KEY, MAP_SEARCH_KEY])]
    );
}

#[test]
fn external_writes_are_detected_by_polling() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("store.db");
    let watcher = SqliteStore::open(&path, "sync").expect("watcher");
    let editor = SqliteStore::open(&path, "sync").expect("editor");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    watcher.subscribe(Arc::new(move |c: &StoreChange| sink.lock().unwrap().push(c.clone())));

    assert_eq!(watcher.poll_external_changes().expect("poll"), None);

    editor.set(&[(LOCATIONS_KEY, json!([{"name": "Home", "address": "1 Main St"}]))]).expect("set");
    let change = watcher.poll_external_changes().expect("poll").expect("change");
    assert_eq!(change, StoreChange::new("sync", [LOCATIONS_KEY]));
    assert_eq!(seen.lock().unwrap().len(), 1);

    // Already observed.
    assert_eq!(watcher.poll_external_changes().expect("poll"), None);
}

#[test]
fn own_writes_are_not_reported_again_by_polling() {
    let store = SqliteStore::open_in_memory("sync").expect("open");
    store.set(&[(MAP_SEARCH_KEY, json!(true))]).expect("set");
    assert_eq!(store.poll_external_changes().expect("poll"), None);
}

#[test]
fn malformed_json_is_a_decode_error() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("store.db");
    drop(SqliteStore::open(&path, "sync").expect("create"));
    {
        let conn = Connection::open(&path).expect("raw open");
        conn.execute(
            "INSERT INTO entries (namespace, key, value) VALUES ('sync', 'locations', '{oops')",
            [],
        )
        .expect("insert raw");
    }

    let store = SqliteStore::open(&path, "sync").expect("open");
    assert!(matches!(store.get(LOCATIONS_KEY), Err(StoreError::Decode { .. })));
}

#[test]
fn open_errors_on_unsupported_schema_version() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("store.db");
    {
        let conn = Connection::open(&path).expect("open raw sqlite db");
        conn.pragma_update(None, "user_version", 99_i32).expect("set user_version pragma");
    }

    match SqliteStore::open(&path, "sync") {
        Err(StoreError::UnsupportedSchemaVersion { found, min_supported, max_supported }) => {
            assert_eq!(found, 99);
            assert_eq!(min_supported, 0);
            assert_eq!(max_supported, CURRENT_SCHEMA_VERSION);
        }
        Err(err) => panic!("expected UnsupportedSchemaVersion error, got {err}"),
        Ok(_) => panic!("expected UnsupportedSchemaVersion error, got Ok(_)"),
    }
}

#[test]
fn version_one_schema_is_migrated() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("store.db");
    {
        let conn = Connection::open(&path).expect("raw open");
        conn.execute_batch(
            r#"
            CREATE TABLE entries (
                namespace TEXT NOT NULL,
                key       TEXT NOT NULL,
                value     TEXT NOT NULL,
                PRIMARY KEY(namespace, key)
            );
            INSERT INTO entries VALUES ('sync', 'mapSearchEnabled', 'true');
            PRAGMA user_version = 1;
            "#,
        )
        .expect("v1 schema");
    }

    let store = SqliteStore::open(&path, "sync").expect("open");
    assert_eq!(store.get(MAP_SEARCH_KEY).expect("get"), Some(json!(true)));
    assert_eq!(store.entries().expect("entries")[0].revision, 1);
}
