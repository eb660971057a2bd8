use crate::debounce::Debounce;
use crate::{ContainerSize, GridLayout, IndexRange, ScrollPosition};

/// The visible sub-rectangle of the resource x date grid, overscan included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub rows: IndexRange,
    pub columns: IndexRange,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn row_indexes(&self) -> core::ops::Range<usize> {
        self.rows.iter()
    }

    pub fn column_indexes(&self) -> core::ops::Range<usize> {
        self.columns.iter()
    }
}

/// Computes the overscanned row and column windows for a scroll position.
///
/// Runs in constant time; the result only describes index bounds. A container that has not
/// been laid out (or a zero pitch) yields an empty viewport.
pub fn compute_visible(
    scroll: ScrollPosition,
    container: ContainerSize,
    layout: &GridLayout,
    resource_count: usize,
    date_count: usize,
) -> Viewport {
    if !container.is_laid_out() {
        return Viewport::default();
    }
    Viewport {
        rows: visible_span(
            scroll.top,
            container.height,
            layout.row_pitch(),
            layout.overscan,
            resource_count,
        ),
        columns: visible_span(
            scroll.left,
            container.width,
            layout.column_pitch(),
            layout.overscan,
            date_count,
        ),
        pixel_width: container.width,
        pixel_height: container.height,
    }
}

fn visible_span(offset: u64, extent: u32, pitch: u64, overscan: usize, count: usize) -> IndexRange {
    if pitch == 0 || extent == 0 || count == 0 {
        return IndexRange::EMPTY;
    }
    let first = (offset / pitch) as usize;
    let end = offset.saturating_add(extent as u64).div_ceil(pitch) as usize;
    IndexRange::new(
        first.saturating_sub(overscan).min(count),
        end.saturating_add(overscan).min(count),
    )
}

/// Result of a resize settling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settled {
    pub(crate) size: ContainerSize,
    /// This is the first laid-out measurement since the tracker was created.
    pub(crate) first: bool,
}

/// Tracks container size and scroll position, and owns the current [`Viewport`].
///
/// Resizes are held back for a settle delay; until then the grid reports not ready so the
/// host can keep it hidden instead of flashing stale dimensions.
#[derive(Clone, Debug, Default)]
pub struct ViewportTracker {
    container: Option<ContainerSize>,
    pending_resize: Debounce<ContainerSize>,
    scroll: ScrollPosition,
    measured: bool,
    viewport: Viewport,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll(&self) -> ScrollPosition {
        self.scroll
    }

    pub fn container(&self) -> Option<ContainerSize> {
        self.container
    }

    pub fn is_ready(&self) -> bool {
        !self.pending_resize.is_pending() && self.container.is_some_and(|c| c.is_laid_out())
    }

    pub fn has_measured(&self) -> bool {
        self.measured
    }

    pub(crate) fn settle_due_ms(&self) -> Option<u64> {
        self.pending_resize.due_ms()
    }

    pub(crate) fn on_resize(&mut self, size: ContainerSize, now_ms: u64, settle_ms: u64) {
        gtrace!(width = size.width, height = size.height, now_ms, "ViewportTracker::on_resize");
        self.pending_resize.schedule(size, now_ms, settle_ms);
    }

    pub(crate) fn settle(&mut self, now_ms: u64) -> Option<Settled> {
        let size = self.pending_resize.take_due(now_ms)?;
        self.container = Some(size);
        if !size.is_laid_out() {
            gdebug!(
                width = size.width,
                height = size.height,
                "container not laid out yet"
            );
            return Some(Settled { size, first: false });
        }
        let first = !self.measured;
        self.measured = true;
        Some(Settled { size, first })
    }

    pub(crate) fn set_scroll(&mut self, scroll: ScrollPosition) {
        self.scroll = scroll;
    }

    pub(crate) fn recompute(&mut self, layout: &GridLayout, resource_count: usize, date_count: usize) {
        self.viewport = match self.container {
            Some(container) if self.is_ready() => {
                compute_visible(self.scroll, container, layout, resource_count, date_count)
            }
            _ => Viewport::default(),
        };
    }
}

/// Horizontal offset that brings today's column to the left edge.
///
/// Days before the range start clamp to zero.
pub fn scroll_left_for_day(days_from_start: i64, layout: &GridLayout) -> u64 {
    (days_from_start.max(0) as u64).saturating_mul(layout.column_pitch())
}
