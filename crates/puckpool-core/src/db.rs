// SQLite persistence for the participant collection.
//
// The collection is stored as one JSON blob under a fixed key, the same way
// a browser app would keep it in local storage: every save rewrites the
// whole collection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::model::Participant;

/// Key under which the participant collection is stored.
pub const PARTICIPANTS_KEY: &str = "nhl_pool_participants_v1";

/// Local store for the participant collection.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the store at `path`. `":memory:"` gives a store that
    /// lives as long as the value.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             CREATE TABLE IF NOT EXISTS pool_state (
                 key        TEXT PRIMARY KEY,
                 value      TEXT NOT NULL,
                 updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             );",
        )
        .with_context(|| format!("failed to prepare pool storage in {path}"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A poisoned lock still hands out the connection.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the stored participant collection.
    pub fn save_participants(&self, participants: &[Participant]) -> Result<()> {
        let blob =
            serde_json::to_string(participants).context("failed to serialize participants")?;
        self.conn()
            .execute(
                "INSERT INTO pool_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![PARTICIPANTS_KEY, blob],
            )
            .context("failed to save participants")?;
        Ok(())
    }

    /// Load the stored participant collection.
    ///
    /// Nothing stored yet gives an empty collection. A blob that no longer
    /// parses as a participant list is logged and also read as empty.
    pub fn load_participants(&self) -> Result<Vec<Participant>> {
        let blob: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM pool_state WHERE key = ?1",
                params![PARTICIPANTS_KEY],
                |row| row.get(0),
            )
            .optional()
            .context("failed to read stored participants")?;

        let Some(blob) = blob else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Participant>>(&blob) {
            Ok(participants) => Ok(participants),
            Err(e) => {
                warn!("Stored participant list is unreadable, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pick, PlayerStats};

    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn stored_rows(db: &Database) -> Vec<(String, String)> {
        db.conn()
            .prepare("SELECT key, value FROM pool_state")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn participants_round_trip_with_stats() {
        let db = test_db();
        let mut p = Participant::new("Alice");
        let mut pick = Pick::new(8478402, "Connor McDavid");
        pick.stats = Some(PlayerStats::zeroed(8478402, "Connor McDavid"));
        p.picks.push(pick);
        p.picks.push(Pick::new(8477934, "Leon Draisaitl"));
        let participants = vec![p, Participant::new("Bob")];

        db.save_participants(&participants).unwrap();
        assert_eq!(db.load_participants().unwrap(), participants);
    }

    #[test]
    fn empty_database_loads_no_participants() {
        let db = test_db();
        assert!(db.load_participants().unwrap().is_empty());
    }

    #[test]
    fn collection_is_one_row_under_fixed_key() {
        let db = test_db();
        db.save_participants(&[Participant::new("A"), Participant::new("B")])
            .unwrap();
        db.save_participants(&[Participant::new("C")]).unwrap();

        let rows = stored_rows(&db);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "nhl_pool_participants_v1");

        let loaded = db.load_participants().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "C");
    }

    #[test]
    fn unreadable_blob_loads_as_empty() {
        let db = test_db();
        db.conn()
            .execute(
                "INSERT INTO pool_state (key, value) VALUES (?1, ?2)",
                params![PARTICIPANTS_KEY, r#"{"not": "a list"}"#],
            )
            .unwrap();
        assert!(db.load_participants().unwrap().is_empty());
    }

    #[test]
    fn save_fails_when_table_is_gone() {
        let db = test_db();
        db.conn().execute_batch("DROP TABLE pool_state;").unwrap();
        let err = db.save_participants(&[Participant::new("A")]).unwrap_err();
        assert!(format!("{err:#}").contains("failed to save participants"));
    }
}
