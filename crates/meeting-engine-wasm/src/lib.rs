//! WASM bindings for meeting-engine.
//!
//! Exposes meeting slot search and Monday-first month grids to JavaScript via
//! `wasm-bindgen`. Zone lists and holiday lists cross the boundary as JSON
//! strings, and results come back as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p meeting-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/worknet-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/meeting_engine_wasm.wasm
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;
use meeting_engine::{CalendarDay, DayKind, LocalTime, MeetingSlot, MonthGrid};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LocalTimeDto {
    zone: &'static str,
    label: String,
    abbreviation: String,
    date: String,
    time: String,
}

impl From<&LocalTime> for LocalTimeDto {
    fn from(l: &LocalTime) -> Self {
        Self {
            zone: l.zone.as_str(),
            label: l.label(),
            abbreviation: l.abbreviation.clone(),
            date: l.date.to_string(),
            time: l.time.format("%H:%M").to_string(),
        }
    }
}

#[derive(Serialize)]
struct MeetingSlotDto {
    utc: String,
    label: String,
    local_times: Vec<LocalTimeDto>,
}

impl From<&MeetingSlot> for MeetingSlotDto {
    fn from(s: &MeetingSlot) -> Self {
        Self {
            utc: s.utc.to_rfc3339(),
            label: s.utc_label(),
            local_times: s.local_times.iter().map(LocalTimeDto::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct DayDto {
    date: String,
    day: u32,
    kind: DayKind,
    heat: i8,
}

impl From<&CalendarDay> for DayDto {
    fn from(d: &CalendarDay) -> Self {
        use chrono::Datelike;
        Self {
            date: d.date.to_string(),
            day: d.date.day(),
            kind: d.kind,
            heat: d.kind.heat_value(),
        }
    }
}

#[derive(Serialize)]
struct MonthGridDto {
    title: String,
    year: i32,
    month: u32,
    weeks: Vec<Vec<DayDto>>,
}

// ---------------------------------------------------------------------------
// Helpers: plain-string errors so the logic is testable off wasm32
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn slots_json(zones_json: &str, date: &str) -> Result<String, String> {
    let zones: Vec<String> =
        serde_json::from_str(zones_json).map_err(|e| format!("Invalid zones JSON: {}", e))?;
    let date = parse_date(date)?;

    let slots = meeting_engine::find_suitable_slots(&zones, date).map_err(|e| e.to_string())?;
    let dtos: Vec<MeetingSlotDto> = slots.iter().map(MeetingSlotDto::from).collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

fn grid_json(year: i32, month: u32, holidays_json: &str) -> Result<String, String> {
    let raw: Vec<String> =
        serde_json::from_str(holidays_json).map_err(|e| format!("Invalid holidays JSON: {}", e))?;
    let holidays = raw
        .iter()
        .map(|s| parse_date(s))
        .collect::<Result<HashSet<NaiveDate>, String>>()?;

    let grid = MonthGrid::new(year, month, &holidays).map_err(|e| e.to_string())?;
    let dto = MonthGridDto {
        title: grid.title(),
        year: grid.year,
        month: grid.month,
        weeks: grid
            .weeks()
            .map(|week| week.iter().map(DayDto::from).collect())
            .collect(),
    };

    serde_json::to_string(&dto).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find the half-hour UTC instants on `date` that fall inside office hours in
/// every requested zone.
///
/// Returns a JSON array of `{utc, label, local_times}` objects, where each
/// local time carries `{zone, label, abbreviation, date, time}`.
///
/// # Arguments
/// - `zones_json` -- JSON array of IANA zone names, e.g. `["Europe/Paris"]`
/// - `date` -- calendar date as `YYYY-MM-DD`
#[wasm_bindgen(js_name = "findSuitableSlots")]
pub fn find_suitable_slots(zones_json: &str, date: &str) -> Result<String, JsValue> {
    slots_json(zones_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Build the Monday-first grid for a month with holidays marked.
///
/// Returns a JSON object `{title, year, month, weeks}`; each week holds seven
/// `{date, day, kind, heat}` cells with `kind` one of `padding`, `holiday`
/// or `free`, and `heat` -1, 0 or 1.
///
/// # Arguments
/// - `year` -- calendar year
/// - `month` -- month number, 1-12
/// - `holidays_json` -- JSON array of `YYYY-MM-DD` holiday dates
#[wasm_bindgen(js_name = "buildMonthGrid")]
pub fn build_month_grid(year: i32, month: u32, holidays_json: &str) -> Result<String, JsValue> {
    grid_json(year, month, holidays_json).map_err(|e| JsValue::from_str(&e))
}
