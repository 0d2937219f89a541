use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::Value;

use crate::db::store::{
    ChangeListener, KeyValueStore, StoreChange, StoreError, StoreResult, Subscribers,
    SubscriptionId, CURRENT_SCHEMA_VERSION, MIN_SUPPORTED_SCHEMA_VERSION,
};

/// Bookkeeping row for a stored key, as reported by `entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub key: String,
    pub revision: i64,
    pub updated_at: Option<String>,
}

/// SQLite-backed key-value store.
///
/// Each key carries a revision that is bumped on every value change. Writes
/// made through this handle notify listeners immediately; writes made by other
/// connections are picked up by `poll_external_changes`.
pub struct SqliteStore {
    namespace: String,
    conn: Mutex<Connection>,
    last_seen: Mutex<HashMap<String, i64>>,
    subscribers: Subscribers,
}

impl SqliteStore {
    /// Open (or create) a store at the given path and ensure the schema exists.
    pub fn open(path: &Path, namespace: impl Into<String>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_with_connection(conn, namespace.into())
    }

    /// Create an in-memory store.
    pub fn open_in_memory(namespace: impl Into<String>) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_with_connection(conn, namespace.into())
    }

    fn init_with_connection(conn: Connection, namespace: String) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&conn)?;
        let last_seen = load_revisions(&conn, &namespace)?;
        Ok(Self {
            namespace,
            conn: Mutex::new(conn),
            last_seen: Mutex::new(last_seen),
            subscribers: Subscribers::new(),
        })
    }

    /// List stored keys of this namespace with their revisions (ordered by key).
    pub fn entries(&self) -> StoreResult<Vec<EntryInfo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT key, revision, updated_at
            FROM entries
            WHERE namespace = ?1
            ORDER BY key
            "#,
        )?;
        let rows = stmt.query_map(params![self.namespace], |row| {
            Ok(EntryInfo { key: row.get(0)?, revision: row.get(1)?, updated_at: row.get(2)? })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Detect writes made by other connections since the last check and
    /// deliver them to listeners as a single change.
    pub fn poll_external_changes(&self) -> StoreResult<Option<StoreChange>> {
        let current = {
            let conn = self.conn()?;
            load_revisions(&conn, &self.namespace)?
        };

        let changed: Vec<String> = {
            let mut last_seen = self.last_seen()?;
            let changed = current
                .iter()
                .filter(|(key, revision)| last_seen.get(*key) != Some(*revision))
                .map(|(key, _)| key.clone())
                .collect();
            *last_seen = current;
            changed
        };

        if changed.is_empty() {
            return Ok(None);
        }
        let change = StoreChange::new(self.namespace.clone(), changed);
        tracing::debug!(keys = ?change.changed_keys, "observed external store change");
        self.subscribers.notify(&change);
        Ok(Some(change))
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Unavailable("SQLite connection lock poisoned".into()))
    }

    fn last_seen(&self) -> StoreResult<MutexGuard<'_, HashMap<String, i64>>> {
        self.last_seen.lock().map_err(|_| StoreError::Unavailable("revision lock poisoned".into()))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

impl KeyValueStore for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StoreError::Decode { key: key.to_string(), source }),
            None => Ok(None),
        }
    }

    fn set(&self, entries: &[(&str, Value)]) -> StoreResult<()> {
        let mut changed: Vec<(String, i64)> = Vec::new();
        {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;
            let now = Utc::now().to_rfc3339();
            for (key, value) in entries {
                let text = serde_json::to_string(value)
                    .map_err(|source| StoreError::Encode { key: (*key).to_string(), source })?;
                let existing: Option<String> = tx
                    .query_row(
                        "SELECT value FROM entries WHERE namespace = ?1 AND key = ?2",
                        params![self.namespace, key],
                        |row| row.get(0),
                    )
                    .optional()?;
                if existing.as_deref() == Some(text.as_str()) {
                    continue;
                }
                let revision: i64 = tx.query_row(
                    r#"
                    INSERT INTO entries (namespace, key, value, revision, updated_at)
                    VALUES (?1, ?2, ?3, 1, ?4)
                    ON CONFLICT(namespace, key) DO UPDATE SET
                        value = excluded.value,
                        revision = entries.revision + 1,
                        updated_at = excluded.updated_at
                    RETURNING revision
                    "#,
                    params![self.namespace, key, text, now],
                    |row| row.get(0),
                )?;
                changed.push(((*key).to_string(), revision));
            }
            tx.commit()?;
        }

        if changed.is_empty() {
            return Ok(());
        }
        {
            let mut last_seen = self.last_seen()?;
            for (key, revision) in &changed {
                last_seen.insert(key.clone(), *revision);
            }
        }
        let change =
            StoreChange::new(self.namespace.clone(), changed.into_iter().map(|(key, _)| key));
        self.subscribers.notify(&change);
        Ok(())
    }

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        self.subscribers.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}

fn load_revisions(conn: &Connection, namespace: &str) -> StoreResult<HashMap<String, i64>> {
    let mut stmt = conn.prepare("SELECT key, revision FROM entries WHERE namespace = ?1")?;
    let rows = stmt.query_map(params![namespace], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    let mut out = HashMap::new();
    for row in rows {
        let (key, revision) = row?;
        out.insert(key, revision);
    }
    Ok(out)
}

/// Apply schema migrations up to `CURRENT_SCHEMA_VERSION`.
fn apply_migrations(conn: &Connection) -> StoreResult<()> {
    let mut current_version = current_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version < 1 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS entries (
                namespace TEXT NOT NULL,
                key       TEXT NOT NULL,
                value     TEXT NOT NULL,
                PRIMARY KEY(namespace, key)
            );
            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
        current_version = 1;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            ALTER TABLE entries ADD COLUMN revision INTEGER NOT NULL DEFAULT 1;
            ALTER TABLE entries ADD COLUMN updated_at TEXT;
            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
