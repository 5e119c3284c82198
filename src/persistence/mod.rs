use crate::deck::DeckRecord;
use std::collections::HashSet;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("deck {0} not found")]
    DeckNotFound(i64),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Access to the external scheduling system's per-deck options.
pub trait DeckConfigStore {
    fn list_decks(&self) -> PersistenceResult<Vec<DeckRecord>>;

    fn find_deck(&self, deck_id: i64) -> PersistenceResult<Option<DeckRecord>> {
        Ok(self
            .list_decks()?
            .into_iter()
            .find(|deck| deck.id == deck_id))
    }

    /// Overwrite the deck's daily new-item limit and persist it.
    fn apply_daily_limit(&self, deck_id: i64, new_limit: u32) -> PersistenceResult<()>;
}

pub fn validate_decks(decks: &[DeckRecord]) -> PersistenceResult<()> {
    let mut seen_ids = HashSet::with_capacity(decks.len());
    for deck in decks {
        if !seen_ids.insert(deck.id) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate deck id {}",
                deck.id
            )));
        }
        if deck.name.trim().is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "deck {} requires a non-empty name",
                deck.id
            )));
        }
    }
    Ok(())
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonDeckStore, load_plan_from_json, load_schedule_from_csv, save_plan_to_json,
    save_schedule_to_csv,
};
pub use memory::MemoryDeckStore;
