use calgrid::{CalendarGrid, ContainerSize, GridOptions};
use calgrid_adapter::Controller;
use chrono::{Months, NaiveDate};

fn main() -> Result<(), calgrid::GridError> {
    // Example: the user scrolled to the left edge and the adapter loads an older month.
    // Column indexes shift, but the anchored day stays at the left edge.
    let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap_or_default();
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap_or_default();

    let grid: CalendarGrid<String> = CalendarGrid::with_dates(
        GridOptions::new().with_today(today),
        vec!["north".to_string(), "south".to_string()],
        start,
        end,
    )?;
    let mut c = Controller::from_grid(grid);
    c.on_resize(ContainerSize::new(800, 300), 0);
    c.tick(100);

    c.on_scroll(0, 30, 200);
    let before = c.capture_first_visible_date();
    println!("anchor before={before:?} scroll_left={}", c.grid().scroll().left);

    let older = start.checked_sub_months(Months::new(1)).unwrap_or(start);
    let applied = c.set_range_anchored(older, end, 300)?;
    println!(
        "range now starts {older}; scroll_left={applied:?} anchor after={:?}",
        c.capture_first_visible_date()
    );
    Ok(())
}
