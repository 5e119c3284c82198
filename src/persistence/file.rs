use super::{DeckConfigStore, PersistenceError, PersistenceResult};
use crate::deck::DeckRecord;
use crate::planner::PlanResult;
use crate::schedule::{DaySchedule, ScheduledDay};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct DeckSnapshot {
    decks: Vec<DeckRecord>,
}

impl DeckSnapshot {
    fn read(path: &Path) -> PersistenceResult<Self> {
        let file = File::open(path)?;
        let snapshot: DeckSnapshot = serde_json::from_reader(file)?;
        super::validate_decks(&snapshot.decks)?;
        Ok(snapshot)
    }

    fn write(&self, path: &Path) -> PersistenceResult<()> {
        super::validate_decks(&self.decks)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Deck options kept in a JSON file of the form `{ "decks": [...] }`.
/// Every applied limit rewrites the whole file.
#[derive(Debug)]
pub struct JsonDeckStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonDeckStore {
    /// Open an existing deck file, validating its contents.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        DeckSnapshot::read(&path)?;
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Write `decks` to `path`, replacing any existing file.
    pub fn create<P: AsRef<Path>>(path: P, decks: Vec<DeckRecord>) -> PersistenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        DeckSnapshot { decks }.write(&path)?;
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeckConfigStore for JsonDeckStore {
    fn list_decks(&self) -> PersistenceResult<Vec<DeckRecord>> {
        Ok(DeckSnapshot::read(&self.path)?.decks)
    }

    fn apply_daily_limit(&self, deck_id: i64, new_limit: u32) -> PersistenceResult<()> {
        let _guard = self.write_lock.lock();
        let mut snapshot = DeckSnapshot::read(&self.path)?;
        let deck = snapshot
            .decks
            .iter_mut()
            .find(|deck| deck.id == deck_id)
            .ok_or(PersistenceError::DeckNotFound(deck_id))?;
        deck.new_per_day = new_limit;
        snapshot.write(&self.path)?;
        debug!(deck_id, new_limit, path = %self.path.display(), "deck file updated");
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ScheduleCsvRecord {
    date: String,
    items: u32,
}

impl From<&ScheduledDay> for ScheduleCsvRecord {
    fn from(day: &ScheduledDay) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            items: day.items,
        }
    }
}

impl ScheduleCsvRecord {
    fn into_day(self) -> PersistenceResult<ScheduledDay> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            PersistenceError::InvalidData(format!("invalid date '{}': {e}", self.date))
        })?;
        Ok(ScheduledDay::new(date, self.items))
    }
}

/// Write a `date,items` CSV, one row per study day.
pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &DaySchedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for day in schedule {
        writer.serialize(ScheduleCsvRecord::from(day))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<DaySchedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut days = Vec::new();
    for record in reader.deserialize::<ScheduleCsvRecord>() {
        days.push(record?.into_day()?);
    }
    if days.windows(2).any(|pair| pair[0].date >= pair[1].date) {
        return Err(PersistenceError::InvalidData(
            "schedule rows must be in strictly increasing date order".into(),
        ));
    }
    let mut schedule = DaySchedule::with_capacity(days.len());
    for day in days {
        schedule.push(day);
    }
    Ok(schedule)
}

pub fn save_plan_to_json<P: AsRef<Path>>(result: &PlanResult, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<PlanResult> {
    let file = File::open(path)?;
    let result: PlanResult = serde_json::from_reader(file)?;
    Ok(result)
}
