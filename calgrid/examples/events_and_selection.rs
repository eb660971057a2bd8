// Example: overlapping events stacked into lanes, and a drag selection committed on mouse up.
use calgrid::{CalendarGrid, ContainerSize, DayBatch, GridOptions};
use chrono::{NaiveDate, NaiveDateTime};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

fn main() -> Result<(), calgrid::GridError> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap_or_default();

    let options = GridOptions::new()
        .with_today(start)
        .with_on_date_range_selected(Some(|room: &String, from: NaiveDate, to: NaiveDate| {
            println!("selected {room}: {from}..={to}");
        }));
    let mut grid: CalendarGrid<String, (), &'static str> = CalendarGrid::with_dates(
        options,
        vec!["suite".to_string(), "loft".to_string()],
        start,
        end,
    )?;
    grid.on_resize(ContainerSize::new(900, 400), 0);
    grid.tick(100);

    grid.add_days_and_event_data([DayBatch::new("suite".to_string())
        .with_event("b1", at(2, 14), at(5, 11), "Ada")
        .with_event("b2", at(4, 14), at(7, 11), "Grace")
        .with_event("b3", at(5, 14), at(6, 11), "Linus")]);

    grid.for_each_visible_event(0, |e| {
        println!(
            "{} lane={} left={:.1} width={:.1} top={}",
            e.event.data, e.placement.lane, e.position.left, e.position.width, e.position.top
        );
    });
    println!("suite row height={}px", grid.row_pixel_height(0));

    // Drag from the 10th back to the 6th on the second row.
    grid.drag_start(1, 9);
    grid.drag_over(1, 7);
    grid.drag_over(1, 5);
    println!("selection={:?}", grid.selection());
    grid.mouse_up();
    Ok(())
}
