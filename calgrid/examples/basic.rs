// Example: minimal grid setup, first settle, and one rendered frame.
use calgrid::{CalendarGrid, ContainerSize, DayBatch, GridOptions};
use chrono::NaiveDate;

fn main() -> Result<(), calgrid::GridError> {
    let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
    let rooms: Vec<String> = (1..=40).map(|i| format!("room-{i:02}")).collect();

    let mut grid: CalendarGrid<String, u32> =
        CalendarGrid::new(GridOptions::new().with_today(today), rooms)?;
    println!(
        "range={:?}..={:?} days={}",
        grid.dates().start_date(),
        grid.dates().end_date(),
        grid.dates().len()
    );

    // The host reports its container size; the grid stays hidden until the resize settles.
    grid.on_resize(ContainerSize::new(1200, 500), 0);
    println!("ready_before_settle={}", grid.is_ready());

    let out = grid.tick(100);
    println!("scroll_left={:?} viewport={:?}", out.scroll_left, grid.viewport());

    if let Some(request) = out.fetch {
        println!(
            "fetch #{} {}..={} for {} rooms",
            request.generation,
            request.start_iso(),
            request.end_iso(),
            request.resources.len()
        );
        // Pretend the backend answered with a price per day.
        let batches: Vec<DayBatch<String, u32>> = request
            .resources
            .iter()
            .map(|room| {
                request
                    .start
                    .iter_days()
                    .take_while(|day| *day <= request.end)
                    .fold(DayBatch::new(room.clone()), |b, day| {
                        b.with_day(day.format(calgrid::DATE_FORMAT).to_string(), 100)
                    })
            })
            .collect();
        let outcome = grid.resolve_fetch(request.generation, Ok::<_, calgrid::BoxError>(batches));
        println!("outcome={outcome:?}");
    }

    let mut loaded = 0usize;
    let mut cells = 0usize;
    grid.for_each_visible_cell(|cell| {
        cells += 1;
        if cell.day.is_some() {
            loaded += 1;
        }
    });
    println!("visible_cells={cells} loaded={loaded}");
    Ok(())
}
