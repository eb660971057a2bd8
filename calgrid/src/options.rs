use std::sync::Arc;

use chrono::NaiveDate;

use crate::{CalendarGrid, GridError, GridResource};

/// A callback fired when the grid's state changes.
///
/// The second argument is `is_ready` (the grid has settled dimensions and may be shown).
pub type OnChangeCallback<R, D, E> = Arc<dyn Fn(&CalendarGrid<R, D, E>, bool) + Send + Sync>;

/// A callback fired once per committed drag selection, with inclusive start/end dates.
pub type OnDateRangeSelected<R> = Arc<dyn Fn(&R, NaiveDate, NaiveDate) + Send + Sync>;

/// A callback fired for errors the host must observe (failed fetches).
pub type OnError = Arc<dyn Fn(&GridError) + Send + Sync>;

/// Pixel geometry and timing knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    /// Height of one event lane.
    pub event_row_height: u32,
    /// Height of the resource header strip above each row of day cells.
    pub resource_row_height: u32,
    /// Horizontal space between day columns.
    pub column_gap: u32,
    pub overscan: usize,
    /// Quiet period after the last scroll before a missing-data fetch is dispatched.
    pub fetch_debounce_ms: u64,
    /// Quiet period after the last resize before new dimensions are applied.
    pub resize_settle_ms: u64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: 70,
            cell_height: 40,
            event_row_height: 20,
            resource_row_height: 45,
            column_gap: 4,
            overscan: 3,
            fetch_debounce_ms: 100,
            resize_settle_ms: 100,
        }
    }
}

impl GridLayout {
    /// Vertical distance between the tops of two consecutive resource rows.
    pub fn row_pitch(&self) -> u64 {
        self.cell_height as u64 + self.resource_row_height as u64
    }

    /// Horizontal distance between the left edges of two consecutive day columns.
    pub fn column_pitch(&self) -> u64 {
        self.cell_width as u64 + self.column_gap as u64
    }
}

/// Month counts around today used to build the initial date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RangeConfig {
    pub past_months: u32,
    pub future_months: u32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            past_months: 1,
            future_months: 24,
        }
    }
}

/// Source of "today" for past/today flags and the initial scroll position.
#[derive(Clone)]
pub enum Today {
    Value(NaiveDate),
    /// Evaluated when the grid is built or its range is rebuilt.
    Provider(Arc<dyn Fn() -> NaiveDate + Send + Sync>),
}

impl Today {
    pub(crate) fn resolve(&self) -> NaiveDate {
        match self {
            Self::Value(d) => *d,
            Self::Provider(f) => f(),
        }
    }
}

impl Default for Today {
    fn default() -> Self {
        Self::Provider(Arc::new(|| chrono::Local::now().date_naive()))
    }
}

impl core::fmt::Debug for Today {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(d) => f.debug_tuple("Value").field(d).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Configuration for [`crate::CalendarGrid`].
///
/// Cheap to clone: callbacks live in `Arc`s.
pub struct GridOptions<R: GridResource, D = (), E = ()> {
    pub layout: GridLayout,
    pub range: RangeConfig,
    pub today: Today,

    /// Enables drag selection of date ranges.
    pub allow_selection: bool,
    /// Allows a drag selection to start on (or extend over) a past day.
    pub allow_select_in_past: bool,

    pub on_date_range_selected: Option<OnDateRangeSelected<R>>,
    pub on_error: Option<OnError>,
    pub on_change: Option<OnChangeCallback<R, D, E>>,
}

impl<R: GridResource, D, E> Clone for GridOptions<R, D, E> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout,
            range: self.range,
            today: self.today.clone(),
            allow_selection: self.allow_selection,
            allow_select_in_past: self.allow_select_in_past,
            on_date_range_selected: self.on_date_range_selected.clone(),
            on_error: self.on_error.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<R: GridResource, D, E> Default for GridOptions<R, D, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GridResource, D, E> GridOptions<R, D, E> {
    pub fn new() -> Self {
        Self {
            layout: GridLayout::default(),
            range: RangeConfig::default(),
            today: Today::default(),
            allow_selection: true,
            allow_select_in_past: false,
            on_date_range_selected: None,
            on_error: None,
            on_change: None,
        }
    }

    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_range(mut self, past_months: u32, future_months: u32) -> Self {
        self.range = RangeConfig {
            past_months,
            future_months,
        };
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Today::Value(today);
        self
    }

    pub fn with_today_provider(
        mut self,
        today: impl Fn() -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        self.today = Today::Provider(Arc::new(today));
        self
    }

    pub fn with_cell_size(mut self, cell_width: u32, cell_height: u32) -> Self {
        self.layout.cell_width = cell_width;
        self.layout.cell_height = cell_height;
        self
    }

    pub fn with_event_row_height(mut self, event_row_height: u32) -> Self {
        self.layout.event_row_height = event_row_height;
        self
    }

    pub fn with_resource_row_height(mut self, resource_row_height: u32) -> Self {
        self.layout.resource_row_height = resource_row_height;
        self
    }

    pub fn with_column_gap(mut self, column_gap: u32) -> Self {
        self.layout.column_gap = column_gap;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.layout.overscan = overscan;
        self
    }

    pub fn with_fetch_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.layout.fetch_debounce_ms = delay_ms;
        self
    }

    pub fn with_resize_settle_ms(mut self, delay_ms: u64) -> Self {
        self.layout.resize_settle_ms = delay_ms;
        self
    }

    pub fn with_allow_selection(mut self, allow_selection: bool) -> Self {
        self.allow_selection = allow_selection;
        self
    }

    pub fn with_allow_select_in_past(mut self, allow_select_in_past: bool) -> Self {
        self.allow_select_in_past = allow_select_in_past;
        self
    }

    pub fn with_on_date_range_selected(
        mut self,
        f: Option<impl Fn(&R, NaiveDate, NaiveDate) + Send + Sync + 'static>,
    ) -> Self {
        self.on_date_range_selected = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_error(mut self, f: Option<impl Fn(&GridError) + Send + Sync + 'static>) -> Self {
        self.on_error = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_change(
        mut self,
        f: Option<impl Fn(&CalendarGrid<R, D, E>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl<R: GridResource, D, E> core::fmt::Debug for GridOptions<R, D, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOptions")
            .field("layout", &self.layout)
            .field("range", &self.range)
            .field("today", &self.today)
            .field("allow_selection", &self.allow_selection)
            .field("allow_select_in_past", &self.allow_select_in_past)
            .finish_non_exhaustive()
    }
}
