use chrono::{NaiveDate, NaiveDateTime};

use crate::debounce::Debounce;
use crate::{DATE_FORMAT, DateIndex, MergeStats, MissingRange, ResourceKey};

/// One day's payload inside a [`DayBatch`], addressed by its `YYYY-MM-DD` date string.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayEntry<D> {
    pub date: String,
    pub data: D,
}

/// One event inside a [`DayBatch`]. The interval is half-open: `[start, end)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventEntry<E> {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub data: E,
}

/// Data returned by the host for one resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayBatch<K, D, E = ()> {
    pub resource_key: K,
    pub day_data: Vec<DayEntry<D>>,
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub event_data: Vec<EventEntry<E>>,
}

impl<K, D, E> DayBatch<K, D, E> {
    pub fn new(resource_key: K) -> Self {
        Self {
            resource_key,
            day_data: Vec::new(),
            event_data: Vec::new(),
        }
    }

    pub fn with_day(mut self, date: impl Into<String>, data: D) -> Self {
        self.day_data.push(DayEntry {
            date: date.into(),
            data,
        });
        self
    }

    pub fn with_event(
        mut self,
        id: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        data: E,
    ) -> Self {
        self.event_data.push(EventEntry {
            id: id.into(),
            start,
            end,
            data,
        });
        self
    }
}

/// A range-based load request handed to the host.
///
/// `generation` identifies the request: pass it back to
/// [`crate::CalendarGrid::resolve_fetch`] or [`crate::CalendarGrid::cancel_fetch`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchRequest<K> {
    pub generation: u64,
    pub resources: Vec<K>,
    /// Inclusive.
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
}

impl<K> FetchRequest<K> {
    pub fn start_iso(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl<K: PartialEq> FetchRequest<K> {
    fn covers_same_window(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.resources == other.resources
    }

    fn touches(&self, key: &K, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end && self.resources.contains(key)
    }
}

/// What happened to a fetch response.
#[derive(Debug)]
pub enum FetchOutcome {
    Applied(MergeStats),
    /// The request was cancelled, superseded by a reset, or never issued.
    Discarded,
    /// The host reported an error; `on_error` has been invoked with it.
    Failed(crate::GridError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Debounces missing-range requests and tracks in-flight fetches by generation.
#[derive(Clone, Debug)]
pub(crate) struct FetchScheduler<K> {
    pending: Debounce<MissingRange<K>>,
    last_generation: u64,
    in_flight: Vec<FetchRequest<K>>,
    /// In-flight generations whose window was invalidated after dispatch.
    stale: Vec<u64>,
}

impl<K> Default for FetchScheduler<K> {
    fn default() -> Self {
        Self {
            pending: Debounce::default(),
            last_generation: 0,
            in_flight: Vec::new(),
            stale: Vec::new(),
        }
    }
}

impl<K: ResourceKey> FetchScheduler<K> {
    /// Monotonic; the first generation is 1.
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.last_generation = self.last_generation.saturating_add(1);
        self.last_generation
    }

    /// Replaces the pending request with the latest computed one.
    ///
    /// `None` clears the pending request: only the last computation is ever dispatched.
    pub(crate) fn schedule(&mut self, missing: Option<MissingRange<K>>, now_ms: u64, delay_ms: u64) {
        match missing {
            Some(missing) => self.pending.schedule(missing, now_ms, delay_ms),
            None => {
                self.pending.cancel();
            }
        }
    }

    pub(crate) fn due_ms(&self) -> Option<u64> {
        self.pending.due_ms()
    }

    pub(crate) fn poll(&mut self, now_ms: u64, dates: &DateIndex) -> Option<FetchRequest<K>> {
        let missing = self.pending.take_due(now_ms)?;
        let (Some(start), Some(end)) = (dates.date_at(missing.start), dates.date_at(missing.end))
        else {
            gwarn!(
                start = missing.start,
                end = missing.end,
                days = dates.len(),
                "missing range outside the date index"
            );
            return None;
        };

        let mut request = FetchRequest {
            generation: 0,
            resources: missing.resources,
            start,
            end,
        };
        let duplicate = self
            .in_flight
            .iter()
            .filter(|r| !self.stale.contains(&r.generation))
            .any(|r| r.covers_same_window(&request));
        if duplicate {
            gtrace!(%start, %end, "identical fetch already in flight");
            return None;
        }

        request.generation = self.next_generation();
        gdebug!(
            generation = request.generation,
            resources = request.resources.len(),
            %start,
            %end,
            "dispatching fetch"
        );
        self.in_flight.push(request.clone());
        Some(request)
    }

    /// Removes `generation` from the in-flight set.
    ///
    /// Returns `false` when the generation is not in flight (cancelled, reset, unknown).
    pub(crate) fn settle(&mut self, generation: u64) -> bool {
        match self.in_flight.iter().position(|r| r.generation == generation) {
            Some(pos) => {
                self.in_flight.remove(pos);
                self.stale.retain(|&g| g != generation);
                true
            }
            None => false,
        }
    }

    pub(crate) fn in_flight(&self) -> &[FetchRequest<K>] {
        &self.in_flight
    }

    /// Marks in-flight requests for `key` whose window intersects `[start, end]` as stale.
    ///
    /// A stale request no longer suppresses an identical dispatch. Its response is still
    /// merged, under its own (older) generation.
    pub(crate) fn mark_stale(&mut self, key: &K, start: NaiveDate, end: NaiveDate) {
        for request in &self.in_flight {
            if request.touches(key, start, end) && !self.stale.contains(&request.generation) {
                gtrace!(generation = request.generation, "in-flight fetch marked stale");
                self.stale.push(request.generation);
            }
        }
    }

    /// Drops the pending request and forgets every in-flight one.
    ///
    /// Responses for forgotten generations are discarded when they arrive.
    pub(crate) fn reset(&mut self) {
        self.pending.cancel();
        self.in_flight.clear();
        self.stale.clear();
    }
}
