use calgrid::{CalendarGrid, GridResource};
use chrono::NaiveDate;

use crate::controller::clamp_scroll_left;

/// A horizontal scroll anchor tied to a calendar day rather than a column index.
///
/// Column indexes shift when the date range is rebuilt (e.g. extending it into the past);
/// anchoring on the date keeps the same day at the left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateAnchor {
    pub date: NaiveDate,
    /// Distance from the anchored column's left edge to `scroll_left`.
    pub offset_in_column: u64,
}

/// Captures the day whose column sits under the left edge of the viewport.
///
/// Returns `None` while the grid is not ready or the scroll offset is past the last column.
pub fn capture_first_visible_date<R, D, E>(grid: &CalendarGrid<R, D, E>) -> Option<DateAnchor>
where
    R: GridResource,
    D: Clone,
    E: Clone,
{
    if !grid.is_ready() {
        return None;
    }
    let pitch = grid.layout().column_pitch();
    if pitch == 0 {
        return None;
    }
    let left = grid.scroll().left;
    let date = grid.dates().date_at((left / pitch) as usize)?;
    Some(DateAnchor {
        date,
        offset_in_column: left % pitch,
    })
}

/// Scrolls so that `anchor.date` is back under the left edge.
///
/// Returns the applied (clamped) offset, which the adapter writes to the real scroll
/// container, or `None` when the date is no longer in the range.
pub fn apply_date_anchor<R, D, E>(
    grid: &mut CalendarGrid<R, D, E>,
    anchor: &DateAnchor,
    now_ms: u64,
) -> Option<u64>
where
    R: GridResource,
    D: Clone,
    E: Clone,
{
    let index = grid.dates().index_of_date(anchor.date)?;
    let target = (index as u64)
        .saturating_mul(grid.layout().column_pitch())
        .saturating_add(anchor.offset_in_column);
    let left = clamp_scroll_left(grid, target);
    atrace!(date = %anchor.date, left, "apply_date_anchor");
    let top = grid.scroll().top;
    grid.on_scroll(top, left, now_ms);
    Some(left)
}
