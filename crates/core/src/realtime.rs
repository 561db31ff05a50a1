//! Live cache kept current by a push feed of row changes.
//!
//! Changes arrive as typed [`ChangeEvent`]s. [`LiveCache::apply`] folds them
//! into a local snapshot, comparing `updated_at` against the cached row and
//! discarding anything older. Deletes leave a tombstone so a late update for
//! a removed row cannot resurrect it.
//!
//! The cache is bounded. Past its capacity the oldest-written slots, live or
//! tombstone, are evicted and their newest write time becomes a floor: an
//! event for a row the cache no longer tracks is stale if it predates the
//! floor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// A row that can be cached and compared by write time.
pub trait Versioned {
    fn id(&self) -> DbId;
    fn updated_at(&self) -> Timestamp;
}

/// One change pushed from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChangeEvent<T> {
    Insert { row: T },
    Update { row: T },
    Delete { id: DbId, deleted_at: Timestamp },
}

impl<T: Versioned> ChangeEvent<T> {
    pub fn row_id(&self) -> DbId {
        match self {
            ChangeEvent::Insert { row } | ChangeEvent::Update { row } => row.id(),
            ChangeEvent::Delete { id, .. } => *id,
        }
    }

    fn written_at(&self) -> Timestamp {
        match self {
            ChangeEvent::Insert { row } | ChangeEvent::Update { row } => row.updated_at(),
            ChangeEvent::Delete { deleted_at, .. } => *deleted_at,
        }
    }
}

/// Result of folding one event into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The cache changed.
    Applied,
    /// The event was older than what the cache already holds.
    Stale,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Live(T),
    Deleted(Timestamp),
}

impl<T: Versioned> Slot<T> {
    fn written_at(&self) -> Timestamp {
        match self {
            Slot::Live(row) => row.updated_at(),
            Slot::Deleted(at) => *at,
        }
    }
}

/// Slots a cache holds before it starts evicting.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Local snapshot of a table, keyed by row id.
#[derive(Debug, Clone)]
pub struct LiveCache<T> {
    slots: HashMap<DbId, Slot<T>>,
    capacity: usize,
    /// Newest write time among evicted slots.
    floor: Option<Timestamp>,
}

impl<T: Versioned> LiveCache<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// An empty cache holding at most `capacity` slots (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::new(),
            capacity: capacity.max(1),
            floor: None,
        }
    }

    /// Seed the cache from a full fetch.
    pub fn from_rows(rows: impl IntoIterator<Item = T>) -> Self {
        let mut cache = Self::new();
        for row in rows {
            cache.slots.insert(row.id(), Slot::Live(row));
        }
        cache.evict_if_full();
        cache
    }

    /// Fold one change into the snapshot.
    ///
    /// Inserts and updates are treated alike: an insert for a row already
    /// cached is an update, and an update for an unknown row is an insert.
    /// Equal timestamps are accepted so a replayed write is idempotent.
    pub fn apply(&mut self, event: ChangeEvent<T>) -> ApplyOutcome {
        let id = event.row_id();
        let known = match self.slots.get(&id) {
            Some(existing) => Some(existing.written_at()),
            None => self.floor,
        };
        if known.is_some_and(|at| event.written_at() < at) {
            return ApplyOutcome::Stale;
        }

        let slot = match event {
            ChangeEvent::Insert { row } | ChangeEvent::Update { row } => Slot::Live(row),
            ChangeEvent::Delete { deleted_at, .. } => Slot::Deleted(deleted_at),
        };
        self.slots.insert(id, slot);
        self.evict_if_full();
        ApplyOutcome::Applied
    }

    /// Drop the oldest-written quarter of the slots once over capacity.
    fn evict_if_full(&mut self) {
        if self.slots.len() <= self.capacity {
            return;
        }
        let keep = self.capacity - self.capacity / 4;
        let mut by_age: Vec<(Timestamp, DbId)> = self
            .slots
            .iter()
            .map(|(id, slot)| (slot.written_at(), *id))
            .collect();
        by_age.sort_unstable();

        let excess = self.slots.len() - keep;
        for (at, id) in by_age.into_iter().take(excess) {
            self.slots.remove(&id);
            self.floor = Some(self.floor.map_or(at, |floor| floor.max(at)));
        }
    }

    pub fn get(&self, id: DbId) -> Option<&T> {
        match self.slots.get(&id) {
            Some(Slot::Live(row)) => Some(row),
            _ => None,
        }
    }

    /// Live rows, newest write first.
    pub fn rows(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self
            .slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Live(row) => Some(row),
                Slot::Deleted(_) => None,
            })
            .collect();
        rows.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        rows
    }

    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Versioned> Default for LiveCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
