//! Suitable meeting slot search across IANA time zones.
//!
//! Sweeps the 48 UTC half-hour grid points of a calendar date, converts each one
//! into every requested zone with `chrono-tz` (historical and seasonal DST rules
//! included), and keeps the instants at which every zone is inside the working
//! window.
//!
//! The window check compares the local **hour** only. With the default
//! `08:00-18:00` window a local time of `18:30` is still accepted, while `07:59`
//! is rejected.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use chrono_tz::Tz;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::error::{PlannerError, Result};

/// Spacing of the UTC grid.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Number of grid points in one UTC day.
pub const SLOTS_PER_DAY: i64 = 24 * 60 / SLOT_STEP_MINUTES;

/// Inclusive range of local hours in which a meeting is acceptable.
///
/// Always satisfies `start_hour <= end_hour <= 23`; deserialization goes
/// through [`WorkingWindow::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkingWindow {
    start_hour: u32,
    end_hour: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowHours {
    start_hour: u32,
    end_hour: u32,
}

impl<'de> Deserialize<'de> for WorkingWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hours = WindowHours::deserialize(deserializer)?;
        Self::new(hours.start_hour, hours.end_hour).map_err(de::Error::custom)
    }
}

impl WorkingWindow {
    /// The standard office window, hours 8 through 18.
    pub const OFFICE_HOURS: WorkingWindow = WorkingWindow {
        start_hour: 8,
        end_hour: 18,
    };

    /// Build a window, rejecting reversed bounds and hours past 23.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(PlannerError::InvalidWindow {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// `start_hour <= hour <= end_hour`. Minutes are not considered.
    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }

    pub fn contains<T: Timelike>(&self, time: &T) -> bool {
        self.contains_hour(time.hour())
    }
}

impl Default for WorkingWindow {
    fn default() -> Self {
        Self::OFFICE_HOURS
    }
}

impl fmt::Display for WorkingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

/// A validated IANA time zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneId {
    tz: Tz,
}

impl TimeZoneId {
    /// Resolve an identifier such as `"Europe/Paris"` against the tz database.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidTimeZone` if the identifier is unknown.
    pub fn parse(id: &str) -> Result<Self> {
        id.parse::<Tz>()
            .map(|tz| Self { tz })
            .map_err(|_| PlannerError::InvalidTimeZone(id.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.tz.name()
    }

    /// Last path segment of the identifier: `"Europe/Paris"` -> `"Paris"`.
    pub fn short_name(&self) -> &'static str {
        let name = self.tz.name();
        name.rsplit('/').next().unwrap_or(name)
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Wall-clock time in this zone at the given UTC instant.
    pub fn local_time(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.tz)
    }
}

impl AsRef<str> for TimeZoneId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TimeZoneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Local wall-clock reading of one zone for a candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalTime {
    pub zone: TimeZoneId,
    /// Zone abbreviation in effect at that instant, e.g. `CEST` or `EST`.
    pub abbreviation: String,
    /// Local calendar date; may differ from the UTC date.
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl LocalTime {
    /// Fails only when the local wall clock falls outside chrono's date range,
    /// which can happen on the first and last representable days.
    fn at(zone: TimeZoneId, utc: DateTime<Utc>) -> Result<Self> {
        let local = zone.local_time(utc);
        let wall = utc
            .naive_utc()
            .checked_add_offset(local.offset().fix())
            .ok_or(PlannerError::DateOutOfRange(utc.date_naive()))?;
        Ok(Self {
            zone,
            abbreviation: local.format("%Z").to_string(),
            date: wall.date(),
            time: wall.time(),
        })
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// `"Paris: 11:00"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.zone.short_name(), self.time.format("%H:%M"))
    }
}

/// A UTC grid instant at which every requested zone is inside the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingSlot {
    pub utc: DateTime<Utc>,
    /// One entry per distinct requested zone, in request order.
    pub local_times: Vec<LocalTime>,
}

impl MeetingSlot {
    /// `"09:00 UTC"`.
    pub fn utc_label(&self) -> String {
        self.utc.format("%H:%M UTC").to_string()
    }

    pub fn local_labels(&self) -> Vec<String> {
        self.local_times.iter().map(LocalTime::label).collect()
    }
}

impl fmt::Display for MeetingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.utc_label(), self.local_labels().join(" | "))
    }
}

/// The 48 UTC half-hour instants of `date`, in ascending order.
pub fn slot_instants(date: NaiveDate) -> impl Iterator<Item = DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    (0..SLOTS_PER_DAY).map(move |i| midnight + Duration::minutes(i * SLOT_STEP_MINUTES))
}

/// Find every half-hour UTC slot on `date` where all `zones` are between 08:00
/// and 18:00 local time (hour granularity).
///
/// An empty `zones` list yields an empty result, never "every slot". Duplicate
/// zones are collapsed; each distinct zone appears once per slot, in first
/// occurrence order. Slots are returned in ascending UTC order. An empty result
/// is a normal outcome, not an error.
///
/// # Errors
/// Returns `PlannerError::InvalidTimeZone` if any zone identifier does not resolve.
/// All zones are validated before the sweep. Returns `PlannerError::DateOutOfRange`
/// when a zone's local time on `date` is not representable, which only happens
/// at the very ends of chrono's calendar.
pub fn find_suitable_slots<S: AsRef<str>>(zones: &[S], date: NaiveDate) -> Result<Vec<MeetingSlot>> {
    find_suitable_slots_in(zones, date, WorkingWindow::default())
}

/// [`find_suitable_slots`] with a caller-chosen working window.
#[tracing::instrument(level = "debug", skip(zones), fields(zone_count = zones.len()))]
pub fn find_suitable_slots_in<S: AsRef<str>>(
    zones: &[S],
    date: NaiveDate,
    window: WorkingWindow,
) -> Result<Vec<MeetingSlot>> {
    let zones = resolve_zones(zones)?;
    if zones.is_empty() {
        debug!("no zones requested, nothing to search");
        return Ok(Vec::new());
    }

    let slots = slot_instants(date)
        .map(|utc| evaluate(utc, &zones, window))
        .filter_map(|slot| slot.transpose())
        .collect::<Result<Vec<MeetingSlot>>>()?;

    debug!(accepted = slots.len(), "slot sweep complete");
    Ok(slots)
}

fn resolve_zones<S: AsRef<str>>(zones: &[S]) -> Result<Vec<TimeZoneId>> {
    let mut resolved: Vec<TimeZoneId> = Vec::with_capacity(zones.len());
    for raw in zones {
        let zone = TimeZoneId::parse(raw.as_ref())?;
        if !resolved.contains(&zone) {
            resolved.push(zone);
        }
    }
    Ok(resolved)
}

/// `zones` must be non-empty.
fn evaluate(
    utc: DateTime<Utc>,
    zones: &[TimeZoneId],
    window: WorkingWindow,
) -> Result<Option<MeetingSlot>> {
    let local_times = zones
        .iter()
        .map(|&zone| LocalTime::at(zone, utc))
        .collect::<Result<Vec<LocalTime>>>()?;

    if let Some(outside) = local_times.iter().find(|lt| !window.contains(&lt.time)) {
        trace!(%utc, zone = %outside.zone, local = %outside.time, "slot rejected");
        return Ok(None);
    }

    Ok(Some(MeetingSlot { utc, local_times }))
}
