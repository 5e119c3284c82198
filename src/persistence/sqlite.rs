use super::{DeckConfigStore, PersistenceError, PersistenceResult};
use crate::deck::DeckRecord;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteDeckStore {
    connection: Mutex<Connection>,
}

impl SqliteDeckStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS decks (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                parent_id INTEGER,
                new_per_day INTEGER NOT NULL CHECK (new_per_day >= 0)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite mutex poisoned".into()))
    }

    /// Insert or replace the given decks in one transaction.
    pub fn save_decks(&self, decks: &[DeckRecord]) -> PersistenceResult<()> {
        super::validate_decks(decks)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO decks (id, name, parent_id, new_per_day) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for deck in decks {
                stmt.execute(params![deck.id, deck.name, deck.parent_id, deck.new_per_day])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn row_to_deck(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeckRecord> {
        Ok(DeckRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_id: row.get(2)?,
            new_per_day: row.get(3)?,
        })
    }
}

impl DeckConfigStore for SqliteDeckStore {
    fn list_decks(&self) -> PersistenceResult<Vec<DeckRecord>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, parent_id, new_per_day FROM decks ORDER BY id ASC")?;
        let rows = stmt.query_map([], Self::row_to_deck)?;
        let mut decks = Vec::new();
        for deck in rows {
            decks.push(deck?);
        }
        Ok(decks)
    }

    fn find_deck(&self, deck_id: i64) -> PersistenceResult<Option<DeckRecord>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, parent_id, new_per_day FROM decks WHERE id = ?1")?;
        let deck = stmt
            .query_row(params![deck_id], Self::row_to_deck)
            .optional()?;
        Ok(deck)
    }

    fn apply_daily_limit(&self, deck_id: i64, new_limit: u32) -> PersistenceResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE decks SET new_per_day = ?1 WHERE id = ?2",
            params![new_limit, deck_id],
        )?;
        if updated == 0 {
            return Err(PersistenceError::DeckNotFound(deck_id));
        }
        Ok(())
    }
}
