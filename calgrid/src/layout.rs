use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{CalendarEvent, GridLayout};

/// A half-open time interval `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Midnight of `first` up to midnight after `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let end = last.succ_opt().unwrap_or(last);
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: end.and_time(NaiveTime::MIN),
        }
    }

    /// An empty interval (`start >= end`) contains no instant and intersects nothing.
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < end && start < self.end && self.start < end
    }
}

fn overlaps<E>(a: &CalendarEvent<E>, b: &CalendarEvent<E>) -> bool {
    a.start < a.end && b.start < b.end && a.start < b.end && b.start < a.end
}

/// Lane assignment for one visible event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPlacement {
    /// Index into the event slice given to [`layout_events`].
    pub event_index: usize,
    /// 1-based.
    pub lane: u32,
    /// Earlier visible events (by `event_index`) whose interval intersects this one.
    pub overlaps: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLayout {
    /// Visible events in input order.
    pub placements: Vec<EventPlacement>,
    /// Highest lane used; zero when no event is visible.
    pub max_concurrency: u32,
}

impl EventLayout {
    pub fn lane_of(&self, event_index: usize) -> Option<u32> {
        self.placements
            .iter()
            .find(|p| p.event_index == event_index)
            .map(|p| p.lane)
    }
}

/// Assigns vertical lanes to the events of one resource that intersect `visible`.
///
/// `events` must be sorted ascending by start. Each event is compared with the visible events
/// placed before it:
/// - no overlap: lane 1
/// - one overlap: lane 2 if the neighbor sits in lane 1, otherwise the lane just below the
///   neighbor's
/// - several overlaps: the first hole between the sorted neighbor lanes, otherwise one past
///   the highest
///
/// The rules are local. They keep overlapping events apart but are not a minimal coloring,
/// and changing them changes rendered layouts.
pub fn layout_events<E>(events: &[CalendarEvent<E>], visible: TimeWindow) -> EventLayout {
    let mut layout = EventLayout::default();
    let mut neighbors: Vec<usize> = Vec::new(); // positions in `layout.placements`
    let mut lanes: Vec<u32> = Vec::new();

    for (event_index, event) in events.iter().enumerate() {
        if !visible.intersects(event.start, event.end) {
            continue;
        }

        neighbors.clear();
        neighbors.extend(
            layout
                .placements
                .iter()
                .enumerate()
                .filter(|(_, p)| overlaps(&events[p.event_index], event))
                .map(|(pos, _)| pos),
        );

        let lane = match neighbors.as_slice() {
            [] => 1,
            [only] => match layout.placements[*only].lane {
                1 => 2,
                l => l - 1,
            },
            _ => {
                lanes.clear();
                lanes.extend(neighbors.iter().map(|&pos| layout.placements[pos].lane));
                lanes.sort_unstable();
                lanes
                    .windows(2)
                    .find(|w| w[1] - w[0] > 1)
                    .map(|w| w[0] + 1)
                    .unwrap_or_else(|| lanes.last().map_or(1, |l| l + 1))
            }
        };

        let overlaps = neighbors
            .iter()
            .map(|&pos| layout.placements[pos].event_index)
            .collect();
        layout.max_concurrency = layout.max_concurrency.max(lane);
        layout.placements.push(EventPlacement {
            event_index,
            lane,
            overlaps,
        });
    }

    layout
}

/// Pixel box of an event inside its resource row, relative to the grid's left edge and the
/// top of the event area.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventPosition {
    pub left: f64,
    pub width: f64,
    pub top: u32,
    pub height: u32,
}

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn position_event<E>(
    event: &CalendarEvent<E>,
    lane: u32,
    range_start: NaiveDate,
    layout: &GridLayout,
) -> EventPosition {
    let origin = range_start.and_time(NaiveTime::MIN);
    let pitch = layout.column_pitch() as f64;
    let start_days = (event.start - origin).num_seconds() as f64 / SECONDS_PER_DAY;
    let span_days = (event.end - event.start).num_seconds().max(0) as f64 / SECONDS_PER_DAY;
    EventPosition {
        left: start_days * pitch,
        width: (span_days * pitch - layout.column_gap as f64).max(0.0),
        top: lane.saturating_sub(1).saturating_mul(layout.event_row_height),
        height: layout.event_row_height,
    }
}
