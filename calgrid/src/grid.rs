use core::cell::Cell;

use chrono::NaiveDate;

use crate::fetch::FetchScheduler;
use crate::selection::SelectionPolicy;
use crate::viewport::scroll_left_for_day;
use crate::{
    BoxError, CacheSnapshot, CalendarDate, CalendarEvent, ContainerSize, ContentSize, DataCache,
    DateIndex, DayBatch, EventLayout, EventPlacement, EventPosition, FetchOutcome, FetchRequest,
    FrameState, GridError, GridLayout, GridOptions, GridResource, IndexRange, MergeStats,
    MonthGroup, RangeConfig, ScrollPosition, Selection, SelectionController, TimeWindow, Viewport,
    ViewportTracker, layout_events, position_event,
};

/// Effects the host must carry out after [`CalendarGrid::tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridTick<K> {
    /// A horizontal scroll offset to apply to the real scroll container (initial jump to today).
    pub scroll_left: Option<u64>,
    /// A load to start; resolve it with [`CalendarGrid::resolve_fetch`].
    pub fetch: Option<FetchRequest<K>>,
}

impl<K> Default for GridTick<K> {
    fn default() -> Self {
        Self {
            scroll_left: None,
            fetch: None,
        }
    }
}

impl<K> GridTick<K> {
    pub fn is_empty(&self) -> bool {
        self.scroll_left.is_none() && self.fetch.is_none()
    }
}

/// A day cell handed to the host's day renderer.
pub struct VisibleCell<'a, R, D> {
    pub row: usize,
    pub column: usize,
    pub resource: &'a R,
    pub date: &'a CalendarDate,
    pub day: Option<&'a D>,
    /// The day one column to the left, for run-continuation styling.
    pub prev_day: Option<&'a D>,
    pub is_selected: bool,
}

/// A column header handed to the host's header renderer.
pub struct VisibleHeader<'a> {
    pub column: usize,
    pub date: &'a CalendarDate,
    pub cell_width: u32,
    pub is_hovered: bool,
}

/// A laid-out event handed to the host's event renderer.
pub struct VisibleEvent<'a, R, E> {
    pub row: usize,
    pub resource: &'a R,
    pub event: &'a CalendarEvent<E>,
    pub placement: &'a EventPlacement,
    pub position: EventPosition,
}

/// A windowed resource x date calendar grid.
///
/// This type is UI-agnostic:
/// - It does not hold any UI objects and never reads a clock; time arrives as `now_ms`.
/// - Your adapter feeds it container sizes, scroll offsets and pointer events.
/// - Rendering is exposed through `for_each_visible_*` iteration over the current viewport.
/// - Data loading is a request/resolve pair: [`Self::tick`] hands out [`FetchRequest`]s and
///   [`Self::resolve_fetch`] merges the host's answer.
///
/// Each grid owns all of its state; instances share nothing.
pub struct CalendarGrid<R: GridResource, D = (), E = ()> {
    options: GridOptions<R, D, E>,
    today: NaiveDate,
    dates: DateIndex,
    resources: Vec<R>,
    cache: DataCache<R::Key, D, E>,
    tracker: ViewportTracker,
    selection: SelectionController<R::Key>,
    hovered_date: Option<usize>,
    fetch: FetchScheduler<R::Key>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<R, D, E> Clone for CalendarGrid<R, D, E>
where
    R: GridResource + Clone,
    D: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            today: self.today,
            dates: self.dates.clone(),
            resources: self.resources.clone(),
            cache: self.cache.clone(),
            tracker: self.tracker.clone(),
            selection: self.selection.clone(),
            hovered_date: self.hovered_date,
            fetch: self.fetch.clone(),
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }
}

impl<R: GridResource, D, E> core::fmt::Debug for CalendarGrid<R, D, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CalendarGrid")
            .field("options", &self.options)
            .field("today", &self.today)
            .field("days", &self.dates.len())
            .field("resources", &self.resources.len())
            .field("viewport", &self.tracker.viewport())
            .field("scroll", &self.tracker.scroll())
            .field("is_ready", &self.tracker.is_ready())
            .field("hovered_date", &self.hovered_date)
            .finish_non_exhaustive()
    }
}

impl<R, D, E> CalendarGrid<R, D, E>
where
    R: GridResource,
    D: Clone,
    E: Clone,
{
    /// Creates a grid whose range is built from `options.range` around today.
    pub fn new(options: GridOptions<R, D, E>, resources: Vec<R>) -> Result<Self, GridError> {
        let today = options.today.resolve();
        let dates = DateIndex::around(today, options.range)?;
        Ok(Self::from_parts(options, today, dates, resources))
    }

    /// Creates a grid over the explicit inclusive range `[start, end]`.
    pub fn with_dates(
        options: GridOptions<R, D, E>,
        resources: Vec<R>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, GridError> {
        let today = options.today.resolve();
        let dates = DateIndex::build_range(start, end, today)?;
        Ok(Self::from_parts(options, today, dates, resources))
    }

    fn from_parts(
        options: GridOptions<R, D, E>,
        today: NaiveDate,
        dates: DateIndex,
        resources: Vec<R>,
    ) -> Self {
        gdebug!(
            %today,
            days = dates.len(),
            resources = resources.len(),
            "CalendarGrid::new"
        );
        let cache = DataCache::new(resources.iter().map(GridResource::key).collect());
        Self {
            options,
            today,
            dates,
            resources,
            cache,
            tracker: ViewportTracker::new(),
            selection: SelectionController::new(),
            hovered_date: None,
            fetch: FetchScheduler::default(),
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &GridOptions<R, D, E> {
        &self.options
    }

    pub fn layout(&self) -> &GridLayout {
        &self.options.layout
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn dates(&self) -> &DateIndex {
        &self.dates
    }

    pub fn month_groups(&self) -> &[MonthGroup] {
        self.dates.month_groups()
    }

    pub fn resources(&self) -> &[R] {
        &self.resources
    }

    pub fn resource(&self, row: usize) -> Option<&R> {
        self.resources.get(row)
    }

    pub fn cache(&self) -> &DataCache<R::Key, D, E> {
        &self.cache
    }

    pub fn cache_snapshot(&self) -> CacheSnapshot<R::Key, D, E> {
        self.cache.snapshot()
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.tracker.is_ready());
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&CalendarGrid<R, D, E>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| std::sync::Arc::new(f) as _);
    }

    /// Replaces the layout knobs and recomputes the viewport.
    pub fn set_layout(&mut self, layout: GridLayout) {
        if self.options.layout == layout {
            return;
        }
        self.options.layout = layout;
        self.recompute_viewport();
        self.notify();
    }

    /// Replaces the resource list.
    ///
    /// If the ordered key list differs from the current one, every cached day and event is
    /// dropped, in-flight fetches are forgotten and the selection is cleared. Call
    /// [`Self::request_refresh`] afterwards to load the new rows.
    pub fn set_resources(&mut self, resources: Vec<R>) {
        let keys = resources.iter().map(GridResource::key).collect();
        let reset = self.cache.set_resources(keys);
        self.resources = resources;
        if reset {
            gdebug!(resources = self.resources.len(), "resource list changed, cache reset");
            self.fetch.reset();
            self.selection.clear();
        }
        self.recompute_viewport();
        self.notify();
    }

    /// Rebuilds the date range as `[start, end]`.
    ///
    /// Cached cells are addressed by column, so the cache is reset and in-flight fetches are
    /// forgotten.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), GridError> {
        let today = self.options.today.resolve();
        let dates = DateIndex::build_range(start, end, today)?;
        self.replace_dates(today, dates);
        Ok(())
    }

    /// Rebuilds the date range from month counts around today.
    pub fn set_range_config(&mut self, range: RangeConfig) -> Result<(), GridError> {
        let today = self.options.today.resolve();
        let dates = DateIndex::around(today, range)?;
        self.options.range = range;
        self.replace_dates(today, dates);
        Ok(())
    }

    fn replace_dates(&mut self, today: NaiveDate, dates: DateIndex) {
        gdebug!(%today, days = dates.len(), "date range rebuilt");
        self.today = today;
        self.dates = dates;
        self.cache.reset();
        self.fetch.reset();
        self.selection.clear();
        self.hovered_date = None;
        self.recompute_viewport();
        self.notify();
    }

    pub fn is_ready(&self) -> bool {
        self.tracker.is_ready()
    }

    pub fn viewport(&self) -> Viewport {
        self.tracker.viewport()
    }

    pub fn visible_rows(&self) -> IndexRange {
        self.tracker.viewport().rows
    }

    pub fn visible_columns(&self) -> IndexRange {
        self.tracker.viewport().columns
    }

    /// Collects visible row indexes into `out` (clears `out` first).
    pub fn collect_visible_rows(&self, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.visible_rows().iter());
    }

    /// Collects visible column indexes into `out` (clears `out` first).
    pub fn collect_visible_columns(&self, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.visible_columns().iter());
    }

    pub fn scroll(&self) -> ScrollPosition {
        self.tracker.scroll()
    }

    pub fn container(&self) -> Option<ContainerSize> {
        self.tracker.container()
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.tracker.viewport(),
            scroll: self.tracker.scroll(),
            is_ready: self.tracker.is_ready(),
            hovered_date: self.hovered_date,
        }
    }

    pub fn content_size(&self) -> ContentSize {
        let layout = &self.options.layout;
        ContentSize {
            width: (self.dates.len() as u64)
                .saturating_mul(layout.column_pitch())
                .saturating_sub(if self.dates.is_empty() {
                    0
                } else {
                    layout.column_gap as u64
                }),
            height: (self.resources.len() as u64).saturating_mul(layout.row_pitch()),
        }
    }

    /// Earliest `now_ms` at which [`Self::tick`] has work to do.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match (self.tracker.settle_due_ms(), self.fetch.due_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn recompute_viewport(&mut self) {
        self.tracker.recompute(
            &self.options.layout,
            self.resources.len(),
            self.dates.len(),
        );
    }

    fn schedule_missing(&mut self, now_ms: u64, delay_ms: u64) {
        let viewport = self.tracker.viewport();
        let missing = match viewport.columns.last() {
            Some(col_end) if !viewport.rows.is_empty() => self.cache.get_missing_data_to_load(
                viewport.row_indexes(),
                viewport.columns.start_index,
                col_end,
            ),
            _ => None,
        };
        self.fetch.schedule(missing, now_ms, delay_ms);
    }

    /// Reports a container size change.
    ///
    /// The new size is applied by a later [`Self::tick`] once `resize_settle_ms` passed without
    /// another resize. Until then the grid is not ready and the viewport is empty.
    pub fn on_resize(&mut self, size: ContainerSize, now_ms: u64) {
        self.tracker
            .on_resize(size, now_ms, self.options.layout.resize_settle_ms);
        self.recompute_viewport();
        self.notify();
    }

    /// Reports a scroll event.
    ///
    /// The viewport is recomputed immediately; the load for any missing cells is debounced by
    /// `fetch_debounce_ms` and only the last computation is dispatched.
    pub fn on_scroll(&mut self, scroll_top: u64, scroll_left: u64, now_ms: u64) {
        gtrace!(scroll_top, scroll_left, now_ms, "on_scroll");
        let delay = self.options.layout.fetch_debounce_ms;
        self.batch_update(|g| {
            g.tracker.set_scroll(ScrollPosition {
                top: scroll_top,
                left: scroll_left,
            });
            g.recompute_viewport();
            g.schedule_missing(now_ms, delay);
            g.notify();
        });
    }

    /// Re-checks the current viewport for missing cells and schedules a load.
    ///
    /// Use after [`Self::set_resources`] or [`Self::clear_days_data`].
    pub fn request_refresh(&mut self, now_ms: u64) {
        let delay = self.options.layout.fetch_debounce_ms;
        self.schedule_missing(now_ms, delay);
    }

    /// Advances timers: applies a settled resize and dispatches a due fetch.
    pub fn tick(&mut self, now_ms: u64) -> GridTick<R::Key> {
        let mut out = GridTick::default();
        self.batch_update(|g| {
            if let Some(settled) = g.tracker.settle(now_ms) {
                if settled.first {
                    let days = g.dates.days_from_start(g.today);
                    let left = scroll_left_for_day(days, &g.options.layout);
                    gdebug!(days, left, "initial scroll to today");
                    let top = g.tracker.scroll().top;
                    g.tracker.set_scroll(ScrollPosition { top, left });
                    out.scroll_left = Some(left);
                }
                g.recompute_viewport();
                if settled.size.is_laid_out() {
                    g.schedule_missing(now_ms, 0);
                }
                g.notify();
            }

            out.fetch = g.fetch.poll(now_ms, &g.dates);
        });
        out
    }

    pub fn in_flight(&self) -> &[FetchRequest<R::Key>] {
        self.fetch.in_flight()
    }

    /// Drops an in-flight request; its response will be discarded.
    pub fn cancel_fetch(&mut self, generation: u64) -> bool {
        self.fetch.settle(generation)
    }

    /// Delivers the host's answer to the request `generation`.
    ///
    /// A success is merged into the cache without overwriting anything a newer generation
    /// wrote. A failure leaves the cache untouched, is passed to `on_error` once and returned.
    /// Responses for cancelled or forgotten requests are discarded, errors included. Nothing
    /// is retried.
    pub fn resolve_fetch<Er>(
        &mut self,
        generation: u64,
        result: Result<Vec<DayBatch<R::Key, D, E>>, Er>,
    ) -> FetchOutcome
    where
        Er: Into<BoxError>,
    {
        if !self.fetch.settle(generation) {
            gtrace!(generation, "response for stale fetch discarded");
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(batches) => {
                let stats = self
                    .cache
                    .add_days_and_event_data(batches, generation, &self.dates);
                self.notify();
                FetchOutcome::Applied(stats)
            }
            Err(source) => {
                let err = GridError::fetch_failed(generation, source);
                gwarn!(generation, error = %err, "fetch failed");
                if let Some(cb) = &self.options.on_error {
                    cb(&err);
                }
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Merges data pushed by the host outside a fetch.
    ///
    /// Every call is stamped with a fresh generation, so a push is last-write-wins: it
    /// replaces cells and same-id events even when the payload is unchanged, and the stored
    /// `generation` fields move forward. The data itself stays the same when a batch is pushed
    /// twice.
    pub fn add_days_and_event_data(
        &mut self,
        batches: impl IntoIterator<Item = DayBatch<R::Key, D, E>>,
    ) -> MergeStats {
        let generation = self.fetch.next_generation();
        let stats = self
            .cache
            .add_days_and_event_data(batches, generation, &self.dates);
        self.notify();
        stats
    }

    /// Invalidates the cells of `key` between `start` and `end` (inclusive).
    ///
    /// Requests already in flight for that window can no longer fill it, and no longer stop
    /// [`Self::request_refresh`] from dispatching a fresh one.
    pub fn clear_days_data(&mut self, key: &R::Key, start: NaiveDate, end: NaiveDate) -> usize {
        let generation = self.fetch.next_generation();
        let removed = self
            .cache
            .clear_days_data(key, start, end, generation, &self.dates);
        self.fetch.mark_stale(key, start, end);
        if removed > 0 {
            self.notify();
        }
        removed
    }

    fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            allow_selection: self.options.allow_selection,
            allow_select_in_past: self.options.allow_select_in_past,
        }
    }

    pub fn selection(&self) -> Option<&Selection<R::Key>> {
        self.selection.selection()
    }

    pub fn is_selected(&self, key: &R::Key, column: usize) -> bool {
        self.selection.is_selected(key, column)
    }

    /// Starts a drag selection on `(row, column)`.
    pub fn drag_start(&mut self, row: usize, column: usize) -> bool {
        let policy = self.selection_policy();
        let (Some(key), Some(date)) = (self.cache.key_at(row), self.dates.get(column)) else {
            gwarn!(row, column, "drag_start outside the grid");
            return false;
        };
        let started = self
            .selection
            .drag_start(key.clone(), column, date.is_past, policy);
        if started {
            self.notify();
        }
        started
    }

    pub fn drag_over(&mut self, row: usize, column: usize) -> bool {
        let policy = self.selection_policy();
        let (Some(key), Some(date)) = (self.cache.key_at(row), self.dates.get(column)) else {
            return false;
        };
        let changed = self.selection.drag_over(key, column, date.is_past, policy);
        if changed {
            self.notify();
        }
        changed
    }

    /// Commits the active selection, if any, through `on_date_range_selected`.
    ///
    /// Returns `false` (and does nothing) when no selection is active.
    pub fn mouse_up(&mut self) -> bool {
        let Some(selection) = self.selection.mouse_up() else {
            return false;
        };
        let row = self
            .cache
            .resource_keys()
            .iter()
            .position(|k| *k == selection.resource_key);
        let start = self.dates.date_at(selection.start_index);
        let end = self.dates.date_at(selection.end_index);
        if let (Some(row), Some(start), Some(end)) = (row, start, end) {
            gdebug!(row, %start, %end, "selection committed");
            if let (Some(cb), Some(resource)) =
                (&self.options.on_date_range_selected, self.resources.get(row))
            {
                cb(resource, start, end);
            }
        }
        self.notify();
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.notify();
        }
    }

    pub fn hovered_date(&self) -> Option<usize> {
        self.hovered_date
    }

    pub fn set_hovered_date(&mut self, column: Option<usize>) {
        let column = column.filter(|&c| c < self.dates.len());
        if self.hovered_date == column {
            return;
        }
        self.hovered_date = column;
        self.notify();
    }

    fn visible_window(&self) -> Option<TimeWindow> {
        let columns = self.visible_columns();
        let first = self.dates.date_at(columns.start_index)?;
        let last = self.dates.date_at(columns.last()?)?;
        Some(TimeWindow::days(first, last))
    }

    /// Lane layout of the events of `row` that intersect the visible columns.
    pub fn row_layout(&self, row: usize) -> EventLayout {
        let (Some(key), Some(window)) = (self.cache.key_at(row), self.visible_window()) else {
            return EventLayout::default();
        };
        layout_events(self.cache.events(key), window)
    }

    /// Pixel height of a resource row: the header strip plus the taller of the day cells and
    /// the stacked event lanes.
    pub fn row_pixel_height(&self, row: usize) -> u32 {
        let layout = &self.options.layout;
        let lanes = self.row_layout(row).max_concurrency;
        let events = layout.event_row_height.saturating_mul(lanes);
        layout
            .resource_row_height
            .saturating_add(layout.cell_height.max(events))
    }

    pub fn for_each_visible_resource(&self, mut f: impl FnMut(usize, &R)) {
        for row in self.visible_rows().iter() {
            if let Some(resource) = self.resources.get(row) {
                f(row, resource);
            }
        }
    }

    pub fn for_each_visible_cell(&self, mut f: impl FnMut(VisibleCell<'_, R, D>)) {
        let viewport = self.tracker.viewport();
        for row in viewport.row_indexes() {
            let (Some(resource), Some(key)) = (self.resources.get(row), self.cache.key_at(row))
            else {
                continue;
            };
            let cached = self.cache.row(key);
            for column in viewport.column_indexes() {
                let Some(date) = self.dates.get(column) else {
                    continue;
                };
                f(VisibleCell {
                    row,
                    column,
                    resource,
                    date,
                    day: cached.and_then(|r| r.day(column)),
                    prev_day: column
                        .checked_sub(1)
                        .and_then(|prev| cached.and_then(|r| r.day(prev))),
                    is_selected: self.selection.is_selected(key, column),
                });
            }
        }
    }

    pub fn for_each_visible_header(&self, mut f: impl FnMut(VisibleHeader<'_>)) {
        let cell_width = self.options.layout.cell_width;
        for column in self.visible_columns().iter() {
            let Some(date) = self.dates.get(column) else {
                continue;
            };
            f(VisibleHeader {
                column,
                date,
                cell_width,
                is_hovered: self.hovered_date == Some(column),
            });
        }
    }

    pub fn for_each_visible_event(&self, row: usize, mut f: impl FnMut(VisibleEvent<'_, R, E>)) {
        let (Some(resource), Some(key), Some(range_start)) = (
            self.resources.get(row),
            self.cache.key_at(row),
            self.dates.start_date(),
        ) else {
            return;
        };
        let events = self.cache.events(key);
        let layout = self.row_layout(row);
        for placement in &layout.placements {
            let event = &events[placement.event_index];
            f(VisibleEvent {
                row,
                resource,
                event,
                placement,
                position: position_event(event, placement.lane, range_start, &self.options.layout),
            });
        }
    }
}
