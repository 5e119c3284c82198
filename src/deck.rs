use crate::persistence::{DeckConfigStore, PersistenceError, PersistenceResult};
use crate::planner::PlanResult;
use crate::request::PlanMode;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// A deck as seen by the external scheduling system, with the one option
/// this crate may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Daily limit on new items.
    pub new_per_day: u32,
}

impl DeckRecord {
    pub fn new(id: i64, name: impl Into<String>, new_per_day: u32) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            new_per_day,
        }
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckNode {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DeckNode>,
}

impl DeckNode {
    /// Build a forest from flat records. Siblings are ordered by case-folded
    /// name. A record whose parent is unknown (or that sits in a parent cycle)
    /// becomes a root.
    pub fn build_tree(records: &[DeckRecord]) -> Vec<DeckNode> {
        let ids: HashSet<i64> = records.iter().map(|r| r.id).collect();
        let mut children_of: HashMap<i64, Vec<&DeckRecord>> = HashMap::new();
        let mut roots: Vec<&DeckRecord> = Vec::new();
        for record in records {
            match record.parent_id {
                Some(parent) if parent != record.id && ids.contains(&parent) => {
                    children_of.entry(parent).or_default().push(record);
                }
                _ => roots.push(record),
            }
        }
        for siblings in children_of.values_mut() {
            sort_by_name(siblings);
        }
        sort_by_name(&mut roots);

        let mut visited = HashSet::with_capacity(records.len());
        let mut forest: Vec<DeckNode> = roots
            .into_iter()
            .map(|record| Self::build_node(record, &children_of, &mut visited))
            .collect();

        let mut orphans: Vec<&DeckRecord> = records
            .iter()
            .filter(|record| !visited.contains(&record.id))
            .collect();
        sort_by_name(&mut orphans);
        for record in orphans {
            if !visited.contains(&record.id) {
                forest.push(Self::build_node(record, &children_of, &mut visited));
            }
        }
        forest
    }

    fn build_node(
        record: &DeckRecord,
        children_of: &HashMap<i64, Vec<&DeckRecord>>,
        visited: &mut HashSet<i64>,
    ) -> DeckNode {
        visited.insert(record.id);
        let mut children = Vec::new();
        if let Some(kids) = children_of.get(&record.id) {
            for kid in kids {
                if visited.contains(&kid.id) {
                    continue;
                }
                children.push(Self::build_node(kid, children_of, visited));
            }
        }
        DeckNode {
            id: record.id,
            name: record.name.clone(),
            children,
        }
    }
}

fn sort_by_name(records: &mut [&DeckRecord]) {
    records.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
}

/// One row of a deck picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub id: i64,
    pub name: String,
    pub depth: usize,
}

impl DeckEntry {
    pub fn label(&self) -> String {
        format!("{}{}", "    ".repeat(self.depth), self.name)
    }
}

/// Depth-first, parents before children.
pub fn flatten_tree(nodes: &[DeckNode]) -> Vec<DeckEntry> {
    fn walk(node: &DeckNode, depth: usize, out: &mut Vec<DeckEntry>) {
        out.push(DeckEntry {
            id: node.id,
            name: node.name.clone(),
            depth,
        });
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    for node in nodes {
        walk(node, 0, &mut out);
    }
    out
}

/// A pending change to a deck's daily new-item limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitUpdate {
    pub deck_id: i64,
    pub new_limit: u32,
}

impl LimitUpdate {
    /// Only rate_from_duration plans produce a rate worth applying.
    pub fn from_result(result: &PlanResult, deck_id: i64) -> Option<Self> {
        if result.mode != PlanMode::RateFromDuration {
            return None;
        }
        result.computed_rate_per_day.map(|new_limit| Self {
            deck_id,
            new_limit,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied { previous: u32, current: u32 },
    Declined,
}

/// Ask `confirm` before writing `update` to `store`. Nothing is written
/// unless `confirm` returns `true`.
pub fn apply_limit_with_confirmation<S, F>(
    store: &S,
    update: LimitUpdate,
    confirm: F,
) -> PersistenceResult<ApplyOutcome>
where
    S: DeckConfigStore + ?Sized,
    F: FnOnce(&DeckRecord, u32) -> bool,
{
    if update.new_limit == 0 {
        return Err(PersistenceError::InvalidData(
            "daily limit must be positive".to_string(),
        ));
    }
    let deck = store
        .find_deck(update.deck_id)?
        .ok_or(PersistenceError::DeckNotFound(update.deck_id))?;

    if !confirm(&deck, update.new_limit) {
        debug!(deck_id = deck.id, "daily limit change declined");
        return Ok(ApplyOutcome::Declined);
    }

    store.apply_daily_limit(deck.id, update.new_limit)?;
    info!(
        deck_id = deck.id,
        deck = %deck.name,
        previous = deck.new_per_day,
        current = update.new_limit,
        "applied daily new-item limit"
    );
    Ok(ApplyOutcome::Applied {
        previous: deck.new_per_day,
        current: update.new_limit,
    })
}
