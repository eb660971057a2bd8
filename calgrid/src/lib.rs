//! A headless, windowed resource x date calendar grid engine.
//!
//! For adapter-level utilities (frame controller, scroll tweens, date anchors), see the
//! `calgrid-adapter` crate.
//!
//! This crate focuses on the state and algorithms behind a scrollable grid of resources
//! (rows) against days (columns): building the day range, turning scroll offsets into
//! overscanned visible index windows, lazily loading only the cells in view, and stacking
//! overlapping events into lanes.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - container size and scroll offsets
//! - a millisecond clock for debounce/settle timers
//! - the actual data fetch, answering [`FetchRequest`]s through [`CalendarGrid::resolve_fetch`]
//! - rendering, driven by the `for_each_visible_*` iterators
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod cache;
mod date_index;
mod debounce;
mod error;
mod fetch;
mod grid;
mod key;
mod layout;
mod options;
mod selection;
mod state;
mod types;
mod viewport;


pub use cache::{CacheSnapshot, CalendarEvent, DataCache, DayCell, MergeStats, MissingRange, ResourceRow};
pub use date_index::{CalendarDate, DATE_FORMAT, DateIndex, MonthGroup};
pub use error::{BoxError, GridError};
pub use fetch::{DayBatch, DayEntry, EventEntry, FetchOutcome, FetchRequest};
pub use grid::{CalendarGrid, GridTick, VisibleCell, VisibleEvent, VisibleHeader};
pub use key::{GridResource, ResourceKey};
pub use layout::{EventLayout, EventPlacement, EventPosition, TimeWindow, layout_events, position_event};
pub use options::{
    GridLayout, GridOptions, OnChangeCallback, OnDateRangeSelected, OnError, RangeConfig, Today,
};
pub use selection::{Selection, SelectionController, SelectionPolicy};
pub use state::FrameState;
pub use types::{ContainerSize, ContentSize, IndexRange, ScrollPosition};
pub use viewport::{Viewport, ViewportTracker, compute_visible, scroll_left_for_day};
