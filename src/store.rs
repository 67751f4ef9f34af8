// 🗄️ Local Storage - typed records as JSON under fixed keys
//
// One SQLite file plays the role of a browser's local storage: a `kv` table
// holding serialized values, plus an append-only `events` table for the
// audit trail of registrations and account decisions.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, error};

// ============================================================================
// FIXED KEYS
// ============================================================================

pub const SWIMMERS_KEY: &str = "swimming_app_swimmers";
pub const USERS_KEY: &str = "swimming_app_users";
pub const CURRENT_USER_KEY: &str = "swimming_app_current_user";

// ============================================================================
// IDENTIFIERS
// ============================================================================

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Record id from the current time in milliseconds. Bumped by one when two
/// ids are requested within the same millisecond in this process.
pub fn new_timestamp_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

// ============================================================================
// AUDIT EVENTS
// ============================================================================

/// Audit trail entry. Every registration, deletion and account decision is
/// appended here and never rewritten.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        setup_database(&conn)?;
        debug!(path = %path.display(), "store opened");

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(Self { conn })
    }

    /// Read and deserialize the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        match raw {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .with_context(|| format!("Corrupted value under '{}'", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;

        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Like [`Store::get`], but any failure is logged and replaced by the
    /// default value. A missing key also yields the default.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                error!(key, error = %format!("{:#}", e), "failed to load stored value");
                T::default()
            }
        }
    }

    /// Write `value`, logging instead of failing.
    pub fn save_or_log<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.set(key, value) {
            error!(key, error = %format!("{:#}", e), "failed to save value");
        }
    }

    pub fn remove_or_log(&self, key: &str) {
        if let Err(e) = self.remove(key) {
            error!(key, error = %format!("{:#}", e), "failed to remove value");
        }
    }

    /// Append an event to the audit trail
    pub fn insert_event(&self, event: &Event) -> Result<()> {
        insert_event(&self.conn, event)
    }

    /// Audit failures never block the operation that produced them.
    pub fn record(&self, event: Event) {
        if let Err(e) = self.insert_event(&event) {
            error!(event_type = %event.event_type, error = %format!("{:#}", e), "failed to record event");
        }
    }

    pub fn get_events_for_entity(&self, entity_type: &str, entity_id: &str) -> Result<Vec<Event>> {
        get_events_for_entity(&self.conn, entity_type, entity_id)
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, raw: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, raw, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        match raw {
            Some(s) => Ok(Some(DateTime::parse_from_rfc3339(&s)?.with_timezone(&Utc))),
            None => Ok(None),
        }
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases silently stay on "memory"
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )?;

    Ok(())
}

pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Events for one entity, newest first
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn test_set_get_remove() {
        let store = Store::open_in_memory().unwrap();

        assert!(store.get::<Note>("note").unwrap().is_none());

        store.set("note", &Note { text: "hello".to_string() }).unwrap();
        let note: Note = store.get("note").unwrap().unwrap();
        assert_eq!(note.text, "hello");

        // Overwrite keeps a single row
        store.set("note", &Note { text: "again".to_string() }).unwrap();
        let note: Note = store.get("note").unwrap().unwrap();
        assert_eq!(note.text, "again");

        store.remove("note").unwrap();
        assert!(store.get::<Note>("note").unwrap().is_none());
    }

    #[test]
    fn test_corrupted_value_falls_back_to_default() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(SWIMMERS_KEY, "{not json").unwrap();

        assert!(store.get::<Vec<Note>>(SWIMMERS_KEY).is_err());

        let notes: Vec<Note> = store.load_or_default(SWIMMERS_KEY);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_missing_key_loads_default() {
        let store = Store::open_in_memory().unwrap();
        let note: Note = store.load_or_default("absent");
        assert_eq!(note, Note::default());
    }

    #[test]
    fn test_timestamp_ids_are_increasing() {
        let a: i64 = new_timestamp_id().parse().unwrap();
        let b: i64 = new_timestamp_id().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_event_log() {
        let store = Store::open_in_memory().unwrap();

        let event = Event::new(
            "user_approved",
            "user",
            "1700000000000",
            serde_json::json!({"status": "approved"}),
            "admin-default",
        );
        store.insert_event(&event).unwrap();

        let events = store.get_events_for_entity("user", "1700000000000").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "user_approved");
        assert_eq!(events[0].actor, "admin-default");

        assert!(store.get_events_for_entity("user", "other").unwrap().is_empty());
    }
}
