//! # meeting-engine
//!
//! Timezone-aware meeting slot search and holiday month grids for teams spread
//! across countries.
//!
//! The engine answers two questions deterministically, with no I/O:
//!
//! - at which UTC half-hours is everyone between 08:00 and 18:00 local time on a
//!   given day (DST-correct via `chrono-tz`)?
//! - what does a Monday-first month calendar look like, and which of its days are
//!   holidays in the selected countries?
//!
//! ## Modules
//!
//! - [`slots`] -- Half-hour UTC sweep filtered by a local working window
//! - [`grid`] -- Month grid construction and day classification
//! - [`holidays`] -- Holiday table filtering (country, month, name search)
//! - [`countries`] -- Injected country → time zone mapping and country groups
//! - [`cache`] -- Caller-owned cache of loaded holiday tables
//! - [`error`] -- Error types

pub mod cache;
pub mod countries;
pub mod error;
pub mod grid;
pub mod holidays;
pub mod slots;

pub use cache::HolidayCache;
pub use countries::{CountryDirectory, Selection};
pub use error::PlannerError;
pub use grid::{build_month_grid, calendar_date, classify_day, CalendarDay, DayKind, MonthGrid};
pub use holidays::{group_by_month, HolidayQuery, HolidayRow, HolidayTable};
pub use slots::{
    find_suitable_slots, find_suitable_slots_in, LocalTime, MeetingSlot, TimeZoneId, WorkingWindow,
};
