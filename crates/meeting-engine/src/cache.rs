//! Caller-owned cache of loaded holiday tables.
//!
//! Entries are keyed by a source identifier (a path, a URL, a content hash) and
//! live until the owner invalidates them. Slot search and grid building never
//! touch this cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;

use tracing::{debug, trace};

use crate::error::{PlannerError, Result};
use crate::holidays::HolidayTable;

#[derive(Debug, Default)]
pub struct HolidayCache {
    entries: HashMap<String, HolidayTable>,
}

impl HolidayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table cached under `key`, running `loader` only on a miss.
    ///
    /// # Errors
    /// `PlannerError::Load` carrying the loader's message. Nothing is cached
    /// when the loader fails.
    pub fn get_or_load<F, E>(&mut self, key: &str, loader: F) -> Result<&HolidayTable>
    where
        F: FnOnce() -> std::result::Result<HolidayTable, E>,
        E: Display,
    {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                trace!(key, "holiday cache hit");
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!(key, "holiday cache miss, loading");
                let table = loader().map_err(|e| PlannerError::Load(e.to_string()))?;
                Ok(&*entry.insert(table))
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&HolidayTable> {
        self.entries.get(key)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        debug!(key, removed, "holiday cache invalidate");
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
