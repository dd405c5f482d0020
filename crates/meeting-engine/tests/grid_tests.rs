//! Tests for month grid construction and day classification.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use meeting_engine::{
    build_month_grid, calendar_date, classify_day, CalendarDay, DayKind, MonthGrid, PlannerError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn holidays(dates: &[NaiveDate]) -> HashSet<NaiveDate> {
    dates.iter().copied().collect()
}

// ── build_month_grid ────────────────────────────────────────────────────────

#[test]
fn february_2025_starts_on_previous_monday_and_ends_in_march() {
    // 2025-02-01 is a Saturday.
    let grid = build_month_grid(2025, 2).unwrap();

    assert_eq!(grid.len(), 35);
    assert_eq!(grid.first(), Some(&date(2025, 1, 27)));
    assert_eq!(grid.last(), Some(&date(2025, 3, 2)));
}

#[test]
fn month_starting_on_monday_has_no_leading_padding() {
    // September 2025 starts on a Monday and ends on a Tuesday.
    let grid = build_month_grid(2025, 9).unwrap();

    assert_eq!(grid.first(), Some(&date(2025, 9, 1)));
    assert_eq!(grid.last(), Some(&date(2025, 10, 5)));
    assert_eq!(grid.len(), 35);
}

#[test]
fn exact_four_week_month_needs_no_padding() {
    // February 2021: Monday the 1st through Sunday the 28th.
    let grid = build_month_grid(2021, 2).unwrap();

    assert_eq!(grid.len(), 28);
    assert_eq!(grid.first(), Some(&date(2021, 2, 1)));
    assert_eq!(grid.last(), Some(&date(2021, 2, 28)));
}

#[test]
fn six_week_month_crosses_the_year_boundary() {
    // December 2024 starts on a Sunday.
    let grid = build_month_grid(2024, 12).unwrap();

    assert_eq!(grid.len(), 42);
    assert_eq!(grid.first(), Some(&date(2024, 11, 25)));
    assert_eq!(grid.last(), Some(&date(2025, 1, 5)));
}

#[test]
fn leap_february_includes_the_29th() {
    let grid = build_month_grid(2024, 2).unwrap();

    assert!(grid.contains(&date(2024, 2, 29)));
    assert_eq!(grid.first(), Some(&date(2024, 1, 29)));
    assert_eq!(grid.last(), Some(&date(2024, 3, 3)));
    assert_eq!(grid.len(), 35);
}

#[test]
fn every_month_of_a_year_is_whole_weeks_monday_first() {
    for month in 1..=12 {
        let grid = build_month_grid(2026, month).unwrap();

        assert_eq!(grid.len() % 7, 0, "month {month}");
        assert_eq!(grid.first().unwrap().weekday(), Weekday::Mon, "month {month}");
        assert_eq!(grid.last().unwrap().weekday(), Weekday::Sun, "month {month}");

        let in_month: Vec<_> = grid.iter().filter(|d| d.month() == month).collect();
        let days_in_month = in_month.len() as u32;
        assert_eq!(in_month.first().unwrap().day(), 1);
        assert_eq!(in_month.last().unwrap().day(), days_in_month);

        for pair in grid.windows(2) {
            assert_eq!(pair[0].succ_opt().unwrap(), pair[1], "grid must be contiguous");
        }
    }
}

#[test]
fn month_out_of_range_is_rejected() {
    assert_eq!(build_month_grid(2025, 0).unwrap_err(), PlannerError::InvalidMonth(0));
    assert_eq!(build_month_grid(2025, 13).unwrap_err(), PlannerError::InvalidMonth(13));
}

#[test]
fn padding_past_the_end_of_the_calendar_is_reported() {
    // The last supported day is a Monday, so the closing Sunday does not exist.
    let year = NaiveDate::MAX.year();
    assert_eq!(
        build_month_grid(year, 12).unwrap_err(),
        PlannerError::DateOutOfRange(NaiveDate::MAX)
    );

    let november = build_month_grid(year, 11).unwrap();
    assert_eq!(november.len() % 7, 0);
    assert_eq!(november.last().unwrap().weekday(), Weekday::Sun);
}

#[test]
fn padding_before_the_start_of_the_calendar_is_reported() {
    // The first supported day is a Thursday; the Monday before it does not exist.
    assert_eq!(
        build_month_grid(NaiveDate::MIN.year(), 1).unwrap_err(),
        PlannerError::DateOutOfRange(NaiveDate::MIN)
    );
}

// ── calendar_date ───────────────────────────────────────────────────────────

#[test]
fn impossible_dates_are_rejected() {
    assert_eq!(
        calendar_date(2025, 2, 30).unwrap_err(),
        PlannerError::InvalidDate {
            year: 2025,
            month: 2,
            day: 30
        }
    );
    assert!(calendar_date(2025, 2, 29).is_err());
    assert_eq!(calendar_date(2024, 2, 29).unwrap(), date(2024, 2, 29));
    assert_eq!(calendar_date(2025, 14, 1).unwrap_err(), PlannerError::InvalidMonth(14));
}

// ── classify_day ────────────────────────────────────────────────────────────

#[test]
fn in_month_holiday_is_tagged_holiday() {
    let set = holidays(&[date(2025, 1, 1)]);
    assert_eq!(
        classify_day(date(2025, 1, 1), 1, &set),
        CalendarDay {
            date: date(2025, 1, 1),
            kind: DayKind::Holiday
        }
    );
}

#[test]
fn out_of_month_day_is_padding_regardless_of_holidays() {
    let set = holidays(&[date(2025, 1, 1)]);
    assert_eq!(classify_day(date(2025, 1, 1), 2, &set).kind, DayKind::Padding);
    assert_eq!(classify_day(date(2025, 1, 1), 2, &HashSet::new()).kind, DayKind::Padding);
}

#[test]
fn in_month_day_without_holiday_is_free() {
    let set = holidays(&[date(2025, 1, 1)]);
    let day = classify_day(date(2025, 1, 2), 1, &set);
    assert_eq!(day.kind, DayKind::Free);
    assert!(day.is_in_month());
}

// ── MonthGrid ───────────────────────────────────────────────────────────────

#[test]
fn month_grid_rows_and_heat_values() {
    let grid = MonthGrid::new(2025, 2, &holidays(&[date(2025, 2, 14)])).unwrap();

    assert_eq!(grid.title(), "February 2025");
    assert_eq!(grid.weeks().count(), 5);

    let heat = grid.heat_values();
    assert_eq!(heat[0], vec![-1, -1, -1, -1, -1, 1, 1]);
    // Week of 10-16 February: Friday the 14th is a holiday.
    assert_eq!(heat[2], vec![1, 1, 1, 1, 0, 1, 1]);
    assert_eq!(heat[4], vec![1, 1, 1, 1, 1, -1, -1]);
}

#[test]
fn month_grid_counts_only_in_month_holidays() {
    // 27 January is shown as padding in the February grid.
    let set = holidays(&[date(2025, 1, 27), date(2025, 2, 14), date(2025, 2, 17)]);
    let grid = MonthGrid::new(2025, 2, &set).unwrap();

    assert_eq!(grid.holiday_count(), 2);
    assert_eq!(grid.free_days().count(), 26);
    assert_eq!(grid.days()[0].kind, DayKind::Padding);
}

#[test]
fn month_grid_rejects_bad_month() {
    assert_eq!(
        MonthGrid::new(2025, 0, &HashSet::new()).unwrap_err(),
        PlannerError::InvalidMonth(0)
    );
}

#[test]
fn day_kind_serializes_lowercase() {
    let json = serde_json::to_string(&DayKind::Holiday).unwrap();
    assert_eq!(json, "\"holiday\"");
}
