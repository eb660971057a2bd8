use calgrid::{
    CalendarGrid, ContainerSize, FetchRequest, GridError, GridOptions, GridResource,
    scroll_left_for_day,
};
use chrono::NaiveDate;

use crate::{DateAnchor, Easing, Tween, apply_date_anchor, capture_first_visible_date};

/// Largest `scroll_left` that still fills the container with columns.
pub(crate) fn clamp_scroll_left<R, D, E>(grid: &CalendarGrid<R, D, E>, left: u64) -> u64
where
    R: GridResource,
    D: Clone,
    E: Clone,
{
    let width = grid.container().map_or(0, |c| c.width as u64);
    left.min(grid.content_size().width.saturating_sub(width))
}

/// Effects of one [`Controller::tick`] the adapter applies to the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutput<K> {
    /// Write this to the real scroll container (initial jump to today, or a tween step).
    pub scroll_left: Option<u64>,
    /// Start this load and answer it through `grid_mut().resolve_fetch`.
    pub fetch: Option<FetchRequest<K>>,
}

impl<K> Default for TickOutput<K> {
    fn default() -> Self {
        Self {
            scroll_left: None,
            fetch: None,
        }
    }
}

impl<K> TickOutput<K> {
    pub fn is_empty(&self) -> bool {
        self.scroll_left.is_none() && self.fetch.is_none()
    }
}

/// A framework-neutral controller that wraps a [`CalendarGrid`] and provides common adapter
/// workflows (date navigation, tween-driven horizontal scrolling, date anchoring).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_resize` / `on_scroll` when UI events occur
/// - `tick(now_ms)` each frame/timer tick, then applying the returned [`TickOutput`]
#[derive(Clone, Debug)]
pub struct Controller<R: GridResource, D = (), E = ()> {
    grid: CalendarGrid<R, D, E>,
    tween: Option<Tween>,
}

impl<R, D, E> Controller<R, D, E>
where
    R: GridResource,
    D: Clone,
    E: Clone,
{
    pub fn new(options: GridOptions<R, D, E>, resources: Vec<R>) -> Result<Self, GridError> {
        Ok(Self::from_grid(CalendarGrid::new(options, resources)?))
    }

    pub fn from_grid(grid: CalendarGrid<R, D, E>) -> Self {
        Self { grid, tween: None }
    }

    pub fn grid(&self) -> &CalendarGrid<R, D, E> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut CalendarGrid<R, D, E> {
        &mut self.grid
    }

    pub fn into_grid(self) -> CalendarGrid<R, D, E> {
        self.grid
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    pub fn on_resize(&mut self, size: ContainerSize, now_ms: u64) {
        self.grid.on_resize(size, now_ms);
    }

    /// Call this when the UI reports a scroll change (e.g. user wheel/drag).
    ///
    /// This cancels any active tween.
    pub fn on_scroll(&mut self, scroll_top: u64, scroll_left: u64, now_ms: u64) {
        self.cancel_animation();
        self.grid.on_scroll(scroll_top, scroll_left, now_ms);
    }

    /// Advances the tween (if any) and the grid's timers.
    ///
    /// The initial scroll-to-today of the first settled resize takes precedence over, and
    /// cancels, a running tween.
    pub fn tick(&mut self, now_ms: u64) -> TickOutput<R::Key> {
        let mut out = TickOutput::default();

        if let Some(tween) = self.tween {
            let left = tween.sample(now_ms);
            let top = self.grid.scroll().top;
            self.grid.on_scroll(top, left, now_ms);
            if tween.is_done(now_ms) {
                adebug!(left, "tween finished");
                self.tween = None;
            }
            out.scroll_left = Some(left);
        }

        let grid_tick = self.grid.tick(now_ms);
        if let Some(left) = grid_tick.scroll_left {
            self.tween = None;
            out.scroll_left = Some(left);
        }
        out.fetch = grid_tick.fetch;
        out
    }

    fn offset_for_date(&self, date: NaiveDate) -> Option<u64> {
        let index = self.grid.dates().index_of_date(date)?;
        let left = scroll_left_for_day(index as i64, self.grid.layout());
        Some(clamp_scroll_left(&self.grid, left))
    }

    /// Brings `date` to the left edge immediately (no animation).
    ///
    /// Returns the applied (clamped) offset, or `None` when the date is outside the range.
    pub fn scroll_to_date(&mut self, date: NaiveDate, now_ms: u64) -> Option<u64> {
        let left = self.offset_for_date(date)?;
        let top = self.grid.scroll().top;
        self.on_scroll(top, left, now_ms);
        Some(left)
    }

    pub fn scroll_to_today(&mut self, now_ms: u64) -> Option<u64> {
        let today = self.grid.today();
        self.scroll_to_date(today, now_ms)
    }

    /// Starts a tween that brings `date` to the left edge.
    ///
    /// Returns the clamped target offset, or `None` when the date is outside the range.
    pub fn start_tween_to_date(
        &mut self,
        date: NaiveDate,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Option<u64> {
        let to = self.offset_for_date(date)?;
        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, to, duration_ms),
            None => {
                let from = self.grid.scroll().left;
                self.tween = Some(Tween::new(from, to, now_ms, duration_ms, easing));
            }
        }
        adebug!(%date, to, duration_ms, "tween started");
        Some(to)
    }

    pub fn capture_first_visible_date(&self) -> Option<DateAnchor> {
        capture_first_visible_date(&self.grid)
    }

    /// Applies a previously captured anchor. This cancels any active tween.
    pub fn apply_date_anchor(&mut self, anchor: &DateAnchor, now_ms: u64) -> Option<u64> {
        self.cancel_animation();
        apply_date_anchor(&mut self.grid, anchor, now_ms)
    }

    /// Rebuilds the date range while keeping the first visible day at the left edge.
    ///
    /// Returns the offset to write back to the scroll container, if the anchored day survived
    /// the change.
    pub fn set_range_anchored(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        now_ms: u64,
    ) -> Result<Option<u64>, GridError> {
        let anchor = self.capture_first_visible_date();
        self.grid.set_range(start, end)?;
        Ok(anchor.and_then(|a| self.apply_date_anchor(&a, now_ms)))
    }
}
