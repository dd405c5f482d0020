//! Monday-first month grids for the holiday calendar view.
//!
//! A grid starts on the Monday on or before the 1st of the month and ends on the
//! Sunday on or after its last day, so it always splits into whole weeks. Days
//! from the neighbouring months are kept as padding.

use std::collections::HashSet;

use chrono::{Datelike, Days, Month, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Classification of a day cell in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    /// Belongs to the previous or next month.
    Padding,
    /// In-month day that is a holiday in at least one selected country.
    Holiday,
    /// In-month day with no holiday in any selected country.
    Free,
}

impl DayKind {
    /// Heatmap encoding: -1 padding, 0 holiday, 1 free.
    pub fn heat_value(self) -> i8 {
        match self {
            DayKind::Padding => -1,
            DayKind::Holiday => 0,
            DayKind::Free => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: DayKind,
}

impl CalendarDay {
    pub fn is_in_month(&self) -> bool {
        self.kind != DayKind::Padding
    }
}

/// Build a date, reporting the offending parts when it does not exist.
///
/// # Errors
/// `InvalidMonth` if `month` is outside 1..=12, `InvalidDate` for days such as
/// February 30.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    month_of(month)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(PlannerError::InvalidDate { year, month, day })
}

/// All dates a Monday-first calendar must render for `month` of `year`.
///
/// The length is always a multiple of 7 and every day of the month appears
/// exactly once.
///
/// # Errors
/// `InvalidMonth` if `month` is outside 1..=12. `DateOutOfRange` if the padding
/// days fall outside chrono's calendar, e.g. December of its last year.
pub fn build_month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = calendar_date(year, month, 1)?;
    let last = last_day_of_month(first);

    let lead = u64::from(first.weekday().num_days_from_monday());
    let trail = u64::from(6 - last.weekday().num_days_from_monday());
    let start = first
        .checked_sub_days(Days::new(lead))
        .ok_or(PlannerError::DateOutOfRange(first))?;
    let end = last
        .checked_add_days(Days::new(trail))
        .ok_or(PlannerError::DateOutOfRange(last))?;

    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// Tag `day` relative to the displayed `month`.
///
/// Only the month number is compared, so a padding day is never reported as a
/// holiday even when it is one.
pub fn classify_day(day: NaiveDate, month: u32, holidays: &HashSet<NaiveDate>) -> CalendarDay {
    let kind = if day.month() != month {
        DayKind::Padding
    } else if holidays.contains(&day) {
        DayKind::Holiday
    } else {
        DayKind::Free
    };
    CalendarDay { date: day, kind }
}

/// A classified month grid, ready to be laid out in rows of seven.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    #[serde(skip)]
    name: Month,
    days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32, holidays: &HashSet<NaiveDate>) -> Result<Self> {
        let name = month_of(month)?;
        let days = build_month_grid(year, month)?
            .into_iter()
            .map(|day| classify_day(day, month, holidays))
            .collect();
        Ok(Self {
            year,
            month,
            name,
            days,
        })
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Monday-to-Sunday rows.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    /// `"February 2025"`.
    pub fn title(&self) -> String {
        format!("{} {}", self.name.name(), self.year)
    }

    pub fn heat_values(&self) -> Vec<Vec<i8>> {
        self.weeks()
            .map(|week| week.iter().map(|day| day.kind.heat_value()).collect())
            .collect()
    }

    /// In-month days with no holiday in any selected country.
    pub fn free_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|day| day.kind == DayKind::Free)
            .map(|day| day.date)
    }

    pub fn holiday_count(&self) -> usize {
        self.days
            .iter()
            .filter(|day| day.kind == DayKind::Holiday)
            .count()
    }
}

/// December is handled without stepping into the next year, which may not exist.
fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .or_else(|| first.with_day(31))
        .unwrap_or(first)
}

fn month_of(month: u32) -> Result<Month> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(PlannerError::InvalidMonth(month))
}
