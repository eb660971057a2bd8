use crate::*;

use calgrid::{CalendarGrid, ContainerSize, GridOptions};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn controller(today: NaiveDate, start: NaiveDate, end: NaiveDate) -> Controller<String, u32> {
    let grid = CalendarGrid::with_dates(
        GridOptions::new().with_today(today),
        vec!["a".to_string(), "b".to_string()],
        start,
        end,
    )
    .unwrap();
    Controller::from_grid(grid)
}

fn ready_quarter() -> Controller<String, u32> {
    let mut c = controller(d(2024, 1, 1), d(2024, 1, 1), d(2024, 3, 31));
    c.on_resize(ContainerSize::new(800, 600), 0);
    let out = c.tick(100);
    assert_eq!(out.scroll_left, Some(0));
    c
}

#[test]
fn first_settle_reports_the_jump_to_today() {
    let mut c = controller(d(2024, 1, 5), d(2024, 1, 1), d(2024, 1, 10));
    c.on_resize(ContainerSize::new(800, 600), 0);
    assert!(c.tick(50).is_empty());

    let out = c.tick(100);
    assert_eq!(out.scroll_left, Some(296));
    let fetch = out.fetch.unwrap();
    assert_eq!(fetch.generation, 1);
    assert_eq!(c.grid().scroll().left, 296);
}

#[test]
fn tween_drives_scroll_left_to_the_target_date() {
    let mut c = ready_quarter();
    let to = c
        .start_tween_to_date(d(2024, 2, 1), 200, 100, Easing::SmoothStep)
        .unwrap();
    assert_eq!(to, 31 * 74);
    assert!(c.is_animating());

    let mut last = 0u64;
    for now_ms in [200u64, 210, 230, 260, 290, 300, 320] {
        if let Some(left) = c.tick(now_ms).scroll_left {
            assert!(left >= last);
            last = left;
        }
    }
    assert!(!c.is_animating());
    assert_eq!(last, to);
    assert_eq!(c.grid().scroll().left, to);

    // The landing position loads after the debounce.
    let fetch = c.tick(400).fetch.unwrap();
    assert_eq!((fetch.start, fetch.end), (d(2024, 1, 29), d(2024, 2, 14)));
}

#[test]
fn user_scroll_cancels_the_tween() {
    let mut c = ready_quarter();
    c.start_tween_to_date(d(2024, 3, 1), 200, 200, Easing::Linear);
    assert!(c.tick(250).scroll_left.is_some());

    c.on_scroll(0, 50, 260);
    assert!(!c.is_animating());
    assert_eq!(c.tick(270).scroll_left, None);
    assert_eq!(c.grid().scroll().left, 50);
}

#[test]
fn retargeting_a_running_tween_starts_from_its_current_sample() {
    let mut c = ready_quarter();
    c.start_tween_to_date(d(2024, 2, 1), 200, 100, Easing::Linear);
    c.tick(250);
    let mid = c.grid().scroll().left;
    assert!(mid > 0 && mid < 31 * 74);

    c.start_tween_to_date(d(2024, 1, 11), 250, 100, Easing::Linear);
    assert_eq!(c.tick(250).scroll_left, Some(mid));
    c.tick(350);
    assert_eq!(c.grid().scroll().left, 10 * 74);
}

#[test]
fn scroll_to_date_clamps_to_the_last_page() {
    let mut c = ready_quarter();
    // 91 columns * 74 - 4 gap - 800 container
    assert_eq!(c.scroll_to_date(d(2024, 3, 31), 200), Some(5930));
    assert_eq!(c.grid().scroll().left, 5930);
    assert_eq!(c.scroll_to_date(d(2025, 1, 1), 300), None);
    assert_eq!(c.grid().scroll().left, 5930);
    assert_eq!(c.scroll_to_today(400), Some(0));
}

#[test]
fn date_anchor_survives_extending_the_range_into_the_past() {
    let mut c = ready_quarter();
    c.on_scroll(0, 40 * 74 + 10, 200);

    let anchor = c.capture_first_visible_date().unwrap();
    assert_eq!(anchor.date, d(2024, 2, 10));
    assert_eq!(anchor.offset_in_column, 10);

    let applied = c
        .set_range_anchored(d(2023, 12, 1), d(2024, 3, 31), 300)
        .unwrap();
    assert_eq!(applied, Some(71 * 74 + 10));
    assert_eq!(c.capture_first_visible_date(), Some(anchor));

    let dropped = c
        .set_range_anchored(d(2024, 3, 1), d(2024, 3, 31), 400)
        .unwrap();
    assert_eq!(dropped, None);
    assert!(c.set_range_anchored(d(2024, 3, 31), d(2024, 3, 1), 500).is_err());
}

#[test]
fn anchors_need_a_ready_grid() {
    let c = controller(d(2024, 1, 1), d(2024, 1, 1), d(2024, 3, 31));
    assert_eq!(capture_first_visible_date(c.grid()), None);

    let mut grid = c.into_grid();
    let anchor = DateAnchor {
        date: d(2024, 1, 3),
        offset_in_column: 0,
    };
    // Without a container the clamp only bounds by content width.
    assert_eq!(apply_date_anchor(&mut grid, &anchor, 0), Some(2 * 74));
}

#[test]
fn tween_samples_are_time_based() {
    let t = Tween::new(0, 1000, 100, 200, Easing::Linear);
    assert_eq!(t.sample(0), 0);
    assert_eq!(t.sample(100), 0);
    assert_eq!(t.sample(200), 500);
    assert!(!t.is_done(299));
    assert!(t.is_done(300));
    assert_eq!(t.sample(10_000), 1000);

    let mut back = t;
    back.retarget(200, 0, 100);
    assert_eq!(back.from_left, 500);
    assert_eq!(back.sample(250), 250);

    assert_eq!(Tween::new(5, 9, 0, 0, Easing::Linear).duration_ms, 1);
}

#[test]
fn easings_pin_both_ends() {
    for easing in [Easing::Linear, Easing::SmoothStep, Easing::EaseOutCubic] {
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        assert_eq!(easing.apply(2.0), 1.0);
        let mid = easing.apply(0.5);
        assert!(mid > 0.0 && mid < 1.0);
    }
    assert!(Easing::EaseOutCubic.apply(0.25) > Easing::Linear.apply(0.25));
}
