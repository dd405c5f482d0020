//! # meeting-engine-python
//!
//! Python bindings for the meeting-engine slot search and month grids, built
//! with PyO3.
//!
//! Exposes the following functions to Python as the `worknet_planner` module:
//!
//! - `find_suitable_meeting_times(timezones, date)` -- `[(utc_label, [local labels])]`
//! - `month_heat_values(year, month, holidays)` -- rows of -1/0/1 heat values

use std::collections::HashSet;

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn parse_date(s: &str) -> PyResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| PyValueError::new_err(format!("Invalid date '{}': {}", s, e)))
}

/// Find meeting times inside office hours (08-18 local) for every zone.
///
/// Args:
///     timezones: IANA zone names (e.g., ["Europe/Paris", "America/New_York"]).
///     date: Calendar date as "YYYY-MM-DD".
///
/// Returns:
///     A list of `(utc_label, local_labels)` tuples such as
///     `("12:00 UTC", ["Paris: 14:00", "New_York: 08:00"])`, in UTC order.
///
/// Raises:
///     ValueError: If the date or any zone name is invalid.
#[pyfunction]
fn find_suitable_meeting_times(
    timezones: Vec<String>,
    date: &str,
) -> PyResult<Vec<(String, Vec<String>)>> {
    let date = parse_date(date)?;
    let slots = meeting_engine::find_suitable_slots(&timezones, date)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(slots
        .iter()
        .map(|slot| (slot.utc_label(), slot.local_labels()))
        .collect())
}

/// Monday-first heat map of a month: -1 other month, 0 holiday, 1 free day.
///
/// Args:
///     year: Calendar year.
///     month: Month number, 1-12.
///     holidays: Holiday dates as "YYYY-MM-DD" strings.
///
/// Returns:
///     One list of seven ints per week row.
///
/// Raises:
///     ValueError: If the month or any holiday date is invalid.
#[pyfunction]
fn month_heat_values(year: i32, month: u32, holidays: Vec<String>) -> PyResult<Vec<Vec<i8>>> {
    let holidays = holidays
        .iter()
        .map(|s| parse_date(s))
        .collect::<PyResult<HashSet<NaiveDate>>>()?;

    let grid = meeting_engine::MonthGrid::new(year, month, &holidays)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(grid.heat_values())
}

/// The `worknet_planner` Python module, implemented in Rust via PyO3.
#[pymodule]
fn worknet_planner(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_suitable_meeting_times, m)?)?;
    m.add_function(wrap_pyfunction!(month_heat_values, m)?)?;
    Ok(())
}
