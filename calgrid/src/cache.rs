use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{DateIndex, DayBatch, ResourceKey};

/// A loaded day for one resource. Presence means "loaded"; absence means "missing".
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell<D> {
    /// Fetch generation that wrote this cell.
    pub generation: u64,
    pub data: D,
}

/// An event owned by one resource. Lanes are computed by [`crate::layout_events`].
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent<E> {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub data: E,
    pub generation: u64,
}

/// Cached days and events for one resource.
#[derive(Clone, Debug)]
pub struct ResourceRow<D, E> {
    days: BTreeMap<usize, DayCell<D>>,
    events: Vec<CalendarEvent<E>>, // sorted by start
    /// Generation of the last clear per column. Writes at or below it are stale.
    cleared: BTreeMap<usize, u64>,
}

impl<D, E> Default for ResourceRow<D, E> {
    fn default() -> Self {
        Self {
            days: BTreeMap::new(),
            events: Vec::new(),
            cleared: BTreeMap::new(),
        }
    }
}

impl<D, E> ResourceRow<D, E> {
    pub fn day(&self, index: usize) -> Option<&D> {
        self.days.get(&index).map(|c| &c.data)
    }

    pub fn cell(&self, index: usize) -> Option<&DayCell<D>> {
        self.days.get(&index)
    }

    pub fn has_day(&self, index: usize) -> bool {
        self.days.contains_key(&index)
    }

    pub fn loaded_days(&self) -> usize {
        self.days.len()
    }

    /// Events ascending by start time.
    pub fn events(&self) -> &[CalendarEvent<E>] {
        &self.events
    }
}

/// An aggregate bounding window of missing cells.
///
/// Every listed resource is requested for the whole `[start, end]` column window, so cells
/// already loaded inside the box are fetched again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingRange<K> {
    pub resources: Vec<K>,
    /// Inclusive column index.
    pub start: usize,
    /// Inclusive column index.
    pub end: usize,
}

/// Counters returned by a merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub cells_written: usize,
    pub events_written: usize,
    /// Day entries whose date has no column (the range changed since the request).
    pub days_dropped: usize,
    /// Cells and events kept because a newer generation already wrote or cleared them.
    pub stale_skipped: usize,
}

type Rows<K, D, E> = HashMap<K, Arc<ResourceRow<D, E>>>;

/// An immutable view of the cache at one point in time.
///
/// Later mutations of the [`DataCache`] copy-on-write and never change a snapshot.
#[derive(Clone, Debug)]
pub struct CacheSnapshot<K, D, E> {
    rows: Arc<Rows<K, D, E>>,
}

impl<K: ResourceKey, D, E> CacheSnapshot<K, D, E> {
    pub fn row(&self, key: &K) -> Option<&ResourceRow<D, E>> {
        self.rows.get(key).map(Arc::as_ref)
    }

    pub fn day(&self, key: &K, index: usize) -> Option<&D> {
        self.row(key)?.day(index)
    }

    pub fn events(&self, key: &K) -> &[CalendarEvent<E>] {
        self.row(key).map(ResourceRow::events).unwrap_or(&[])
    }
}

/// Sparse per-(resource, column) day storage plus per-resource event lists.
///
/// Callers read through shared references and mutate only through the methods below.
#[derive(Clone, Debug)]
pub struct DataCache<K, D, E = ()> {
    keys: Vec<K>,
    rows: Arc<Rows<K, D, E>>,
}

impl<K, D, E> Default for DataCache<K, D, E> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            rows: Arc::new(HashMap::new()),
        }
    }
}

impl<K: ResourceKey, D: Clone, E: Clone> DataCache<K, D, E> {
    pub fn new(keys: Vec<K>) -> Self {
        let mut cache = Self::default();
        cache.set_resources(keys);
        cache
    }

    /// Resource keys in row order.
    pub fn resource_keys(&self) -> &[K] {
        &self.keys
    }

    pub fn key_at(&self, row: usize) -> Option<&K> {
        self.keys.get(row)
    }

    /// Replaces the resource set.
    ///
    /// A different key list (order included) discards every cell and event. An identical list
    /// keeps the cache. Returns `true` when a reset happened.
    pub fn set_resources(&mut self, keys: Vec<K>) -> bool {
        if keys == self.keys {
            return false;
        }
        gdebug!(resources = keys.len(), "DataCache::set_resources reset");
        self.keys = keys;
        self.reset();
        true
    }

    /// Drops every cell and event, keeping the resource set.
    pub fn reset(&mut self) {
        self.rows = Arc::new(
            self.keys
                .iter()
                .map(|k| (k.clone(), Arc::new(ResourceRow::default())))
                .collect(),
        );
    }

    pub fn snapshot(&self) -> CacheSnapshot<K, D, E> {
        CacheSnapshot {
            rows: Arc::clone(&self.rows),
        }
    }

    pub fn row(&self, key: &K) -> Option<&ResourceRow<D, E>> {
        self.rows.get(key).map(Arc::as_ref)
    }

    pub fn day(&self, key: &K, index: usize) -> Option<&D> {
        self.row(key)?.day(index)
    }

    pub fn events(&self, key: &K) -> &[CalendarEvent<E>] {
        self.row(key).map(ResourceRow::events).unwrap_or(&[])
    }

    /// Finds the bounding window of absent cells among the given rows and the inclusive column
    /// window `[col_start, col_end]`.
    ///
    /// Returns `None` iff every scanned cell is present.
    pub fn get_missing_data_to_load(
        &self,
        visible_resource_indexes: impl IntoIterator<Item = usize>,
        col_start: usize,
        col_end: usize,
    ) -> Option<MissingRange<K>> {
        if col_end < col_start {
            return None;
        }

        let mut resources = Vec::new();
        let mut window: Option<(usize, usize)> = None;

        for row in visible_resource_indexes {
            let Some(key) = self.keys.get(row) else {
                gwarn!(row, resources = self.keys.len(), "visible row out of bounds");
                continue;
            };
            let loaded = self.rows.get(key);
            let is_missing = |i: &usize| loaded.is_none_or(|r| !r.has_day(*i));

            let Some(first) = (col_start..=col_end).find(is_missing) else {
                continue;
            };
            let last = (col_start..=col_end).rev().find(is_missing).unwrap_or(first);

            resources.push(key.clone());
            window = Some(match window {
                Some((s, e)) => (s.min(first), e.max(last)),
                None => (first, last),
            });
        }

        let (start, end) = window?;
        Some(MissingRange {
            resources,
            start,
            end,
        })
    }

    /// Merges host data written by fetch `generation`.
    ///
    /// Day entries are placed through the date index (unknown dates are dropped). Events merge
    /// by id. Nothing written by a newer generation is overwritten, and a day cleared by
    /// generation `g` accepts only writes newer than `g`. Applying the same batch twice with
    /// the same generation leaves the cache unchanged.
    pub fn add_days_and_event_data(
        &mut self,
        batches: impl IntoIterator<Item = DayBatch<K, D, E>>,
        generation: u64,
        dates: &DateIndex,
    ) -> MergeStats {
        let mut stats = MergeStats::default();
        let rows = Arc::make_mut(&mut self.rows);

        for batch in batches {
            let Some(row) = rows.get_mut(&batch.resource_key) else {
                gtrace!("batch for unknown resource dropped");
                continue;
            };
            let row = Arc::make_mut(row);

            for entry in batch.day_data {
                let Some(index) = dates.index_of(&entry.date) else {
                    gtrace!(date = %entry.date, "day outside range dropped");
                    stats.days_dropped += 1;
                    continue;
                };
                let newer_cell = row.days.get(&index).is_some_and(|c| c.generation > generation);
                let cleared_after = row.cleared.get(&index).is_some_and(|&g| g >= generation);
                if newer_cell || cleared_after {
                    stats.stale_skipped += 1;
                    continue;
                }
                row.cleared.remove(&index);
                row.days.insert(
                    index,
                    DayCell {
                        generation,
                        data: entry.data,
                    },
                );
                stats.cells_written += 1;
            }

            if batch.event_data.is_empty() {
                continue;
            }
            for entry in batch.event_data {
                let event = CalendarEvent {
                    id: entry.id,
                    start: entry.start,
                    end: entry.end,
                    data: entry.data,
                    generation,
                };
                match row.events.iter_mut().find(|e| e.id == event.id) {
                    Some(existing) if generation > existing.generation => {
                        *existing = event;
                        stats.events_written += 1;
                    }
                    Some(_) => stats.stale_skipped += 1,
                    None => {
                        row.events.push(event);
                        stats.events_written += 1;
                    }
                }
            }
            row.events.sort_by_key(|e| e.start);
        }

        gtrace!(
            generation,
            cells = stats.cells_written,
            events = stats.events_written,
            dropped = stats.days_dropped,
            stale = stats.stale_skipped,
            "merged batch"
        );
        stats
    }

    /// Removes the cells of `key` for every column in `[start, end]`.
    ///
    /// Every column in the window, loaded or not, is marked as cleared by `generation`: a later
    /// merge from that generation or an older one leaves it missing. Dates outside the range
    /// are clamped away. Returns the number of cells removed.
    pub fn clear_days_data(
        &mut self,
        key: &K,
        start: NaiveDate,
        end: NaiveDate,
        generation: u64,
        dates: &DateIndex,
    ) -> usize {
        let Some(columns) = dates.clamp_to_columns(start, end) else {
            return 0;
        };
        if !self.rows.contains_key(key) {
            return 0;
        }

        let rows = Arc::make_mut(&mut self.rows);
        let Some(row) = rows.get_mut(key) else {
            return 0;
        };
        let row = Arc::make_mut(row);
        let before = row.days.len();
        row.days.retain(|i, _| !columns.contains(*i));
        for index in columns.iter() {
            let mark = row.cleared.entry(index).or_insert(generation);
            *mark = (*mark).max(generation);
        }
        let removed = before - row.days.len();
        gtrace!(removed, generation, "clear_days_data");
        removed
    }
}
