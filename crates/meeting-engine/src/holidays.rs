//! In-memory public holiday table and the filters the planner applies to it.
//!
//! Rows arrive already parsed (`country`, `date`, `name`). Reading the source
//! spreadsheet is the caller's concern.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// One public holiday in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRow {
    pub country: String,
    pub date: NaiveDate,
    #[serde(alias = "holiday")]
    pub name: String,
}

/// Which rows of a [`HolidayTable`] to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayQuery {
    pub year: i32,
    pub month: u32,
    /// Empty means every country.
    pub countries: Vec<String>,
    /// Case-insensitive substring of the holiday name; blank means no search.
    pub search: Option<String>,
}

impl HolidayQuery {
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            countries: Vec::new(),
            search: None,
        }
    }

    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    rows: Vec<HolidayRow>,
}

impl HolidayTable {
    pub fn new(rows: Vec<HolidayRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[HolidayRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r.country.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct years that have at least one holiday, ascending.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.rows.iter().map(|r| r.date.year()).collect();
        set.into_iter().collect()
    }

    /// Rows matching `query`, sorted by date then country.
    ///
    /// # Errors
    /// `InvalidMonth` if `query.month` is outside 1..=12.
    pub fn filter(&self, query: &HolidayQuery) -> Result<Vec<&HolidayRow>> {
        check_month(query.month)?;
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<&HolidayRow> = self
            .rows
            .iter()
            .filter(|r| r.date.year() == query.year && r.date.month() == query.month)
            .filter(|r| query.countries.is_empty() || query.countries.contains(&r.country))
            .filter(|r| match &needle {
                Some(needle) => r.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| (a.date, &a.country).cmp(&(b.date, &b.country)));
        Ok(rows)
    }

    /// Dates in `month` of `year` that are a holiday in any of `countries`.
    ///
    /// This is the set consumed by [`crate::grid::classify_day`]. An empty
    /// selection yields an empty set.
    ///
    /// # Errors
    /// `InvalidMonth` if `month` is outside 1..=12.
    pub fn holiday_dates<S: AsRef<str>>(
        &self,
        countries: &[S],
        year: i32,
        month: u32,
    ) -> Result<HashSet<NaiveDate>> {
        check_month(month)?;
        Ok(self
            .rows
            .iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .filter(|r| countries.iter().any(|c| c.as_ref() == r.country))
            .map(|r| r.date)
            .collect())
    }
}

/// Group rows by `(year, month)`, ascending. Row order inside a group is kept.
pub fn group_by_month<'a, I>(rows: I) -> BTreeMap<(i32, u32), Vec<&'a HolidayRow>>
where
    I: IntoIterator<Item = &'a HolidayRow>,
{
    let mut groups: BTreeMap<(i32, u32), Vec<&'a HolidayRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.date.year(), row.date.month()))
            .or_default()
            .push(row);
    }
    groups
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(PlannerError::InvalidMonth(month))
    }
}
