//! Country to time zone mapping and named country groups.
//!
//! The directory is built from caller-supplied tables (typically the planner's
//! config file) so the engine carries no embedded country data.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::slots::TimeZoneId;

/// Starting point for a country selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// Members of a named group, e.g. `"steering"`.
    Group(String),
    All,
}

#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    zones: BTreeMap<String, TimeZoneId>,
    groups: BTreeMap<String, Vec<String>>,
}

impl CountryDirectory {
    /// # Errors
    /// `InvalidTimeZone` if any mapped zone does not resolve.
    pub fn new(
        zones: BTreeMap<String, String>,
        groups: BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        let zones = zones
            .into_iter()
            .map(|(country, zone)| TimeZoneId::parse(&zone).map(|tz| (country, tz)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        debug!(countries = zones.len(), groups = groups.len(), "country directory built");
        Ok(Self { zones, groups })
    }

    pub fn zone_for(&self, country: &str) -> Option<TimeZoneId> {
        self.zones.get(country).copied()
    }

    /// Zones of the mapped countries in `countries`, in input order.
    /// Countries without a mapping are skipped.
    pub fn zones_for<S: AsRef<str>>(&self, countries: &[S]) -> Vec<TimeZoneId> {
        countries
            .iter()
            .filter_map(|c| self.zone_for(c.as_ref()))
            .collect()
    }

    /// Countries that have a zone mapping, sorted.
    pub fn countries(&self) -> impl Iterator<Item = (&str, TimeZoneId)> {
        self.zones.iter().map(|(c, tz)| (c.as_str(), *tz))
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Resolve a starting selection against the countries actually `available`.
    ///
    /// `All` returns `available` as given; a group keeps only members present in
    /// `available`, in group order.
    ///
    /// # Errors
    /// `UnknownGroup` if the named group does not exist.
    pub fn selection<S: AsRef<str>>(&self, mode: &Selection, available: &[S]) -> Result<Vec<String>> {
        match mode {
            Selection::None => Ok(Vec::new()),
            Selection::All => Ok(available.iter().map(|c| c.as_ref().to_string()).collect()),
            Selection::Group(name) => {
                let members = self
                    .group(name)
                    .ok_or_else(|| PlannerError::UnknownGroup(name.clone()))?;
                Ok(members
                    .iter()
                    .filter(|m| available.iter().any(|a| a.as_ref() == m.as_str()))
                    .cloned()
                    .collect())
            }
        }
    }
}
