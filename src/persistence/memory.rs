use super::{DeckConfigStore, PersistenceError, PersistenceResult};
use crate::deck::DeckRecord;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Deck options held in process memory.
#[derive(Debug, Default)]
pub struct MemoryDeckStore {
    decks: RwLock<BTreeMap<i64, DeckRecord>>,
}

impl MemoryDeckStore {
    pub fn new<I>(decks: I) -> PersistenceResult<Self>
    where
        I: IntoIterator<Item = DeckRecord>,
    {
        let decks: Vec<DeckRecord> = decks.into_iter().collect();
        super::validate_decks(&decks)?;
        Ok(Self {
            decks: RwLock::new(decks.into_iter().map(|d| (d.id, d)).collect()),
        })
    }

    pub fn insert(&self, deck: DeckRecord) {
        self.decks.write().insert(deck.id, deck);
    }
}

impl DeckConfigStore for MemoryDeckStore {
    fn list_decks(&self) -> PersistenceResult<Vec<DeckRecord>> {
        Ok(self.decks.read().values().cloned().collect())
    }

    fn find_deck(&self, deck_id: i64) -> PersistenceResult<Option<DeckRecord>> {
        Ok(self.decks.read().get(&deck_id).cloned())
    }

    fn apply_daily_limit(&self, deck_id: i64, new_limit: u32) -> PersistenceResult<()> {
        let mut guard = self.decks.write();
        let deck = guard
            .get_mut(&deck_id)
            .ok_or(PersistenceError::DeckNotFound(deck_id))?;
        deck.new_per_day = new_limit;
        Ok(())
    }
}
