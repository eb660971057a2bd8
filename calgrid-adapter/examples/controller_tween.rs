use calgrid::{ContainerSize, GridOptions};
use calgrid_adapter::{Controller, Easing};
use chrono::NaiveDate;

fn main() -> Result<(), calgrid::GridError> {
    // Example: a controller driving a frame loop without holding any UI objects.
    //
    // An adapter would:
    // - forward resize/scroll events
    // - call tick(now_ms) in a frame loop / timer
    // - apply the returned scroll_left to the real scroll container (if any)
    // - start any returned fetch and answer it through grid_mut().resolve_fetch
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap_or_default();
    let mut c: Controller<u32, u8> = Controller::new(
        GridOptions::new().with_today(today).with_range(2, 6),
        (1..=25).collect(),
    )?;

    c.on_resize(ContainerSize::new(1000, 600), 0);
    let out = c.tick(100);
    println!("initial scroll_left={:?}", out.scroll_left);

    let target = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap_or_default();
    let to = c.start_tween_to_date(target, 200, 240, Easing::EaseOutCubic);
    println!("target_offset={to:?}");

    let mut now_ms = 200u64;
    while c.is_animating() {
        now_ms += 16;
        let out = c.tick(now_ms);
        if let Some(left) = out.scroll_left {
            println!("t={now_ms} left={left} columns={:?}", c.grid().visible_columns());
        }
    }

    // Let the fetch debounce elapse.
    now_ms += 100;
    if let Some(fetch) = c.tick(now_ms).fetch {
        println!(
            "fetch #{} {}..={} resources={:?}",
            fetch.generation,
            fetch.start_iso(),
            fetch.end_iso(),
            fetch.resources
        );
    }
    Ok(())
}
