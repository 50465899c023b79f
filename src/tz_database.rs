//! Named timezones.

use alloc::collections::BTreeMap;
use alloc::string::String;

use tracing::debug;

use crate::{SharedTzInfo, TzLookupError};

/// A registry of timezones by region name and by abbreviation.
///
/// The database is filled through `&mut self` and can then be shared, for
/// instance in an `Arc`, for concurrent lookups.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use utc_calendar::{EuSummerTime, TzDatabase, TzTable, UtcTimeSpan};
///
/// let mut db = TzDatabase::new();
/// let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
/// db.add_tz_info("Europe/Oslo", Arc::new(TzTable::from_rule_default(&rule)));
///
/// assert_eq!(db.lookup_by_region("Europe/Oslo").unwrap().name(), "CET");
/// assert!(db.lookup_by_abbreviation("CET").is_ok());
/// assert!(db.lookup_by_region("Europe/Paris").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TzDatabase {
    regions: BTreeMap<String, SharedTzInfo>,
    abbreviations: BTreeMap<String, SharedTzInfo>,
}

impl TzDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a timezone under a region name and under its own name as an
    /// abbreviation, replacing previous registrations.
    pub fn add_tz_info(&mut self, region: impl Into<String>, tz: SharedTzInfo) {
        let region = region.into();
        debug!(region = region.as_str(), tz = tz.name(), "timezone registered");

        self.abbreviations.insert(tz.name().into(), tz.clone());
        self.regions.insert(region, tz);
    }

    /// Registers a timezone under an abbreviation only.
    pub fn add_abbreviation(&mut self, name: impl Into<String>, tz: SharedTzInfo) {
        let name = name.into();
        debug!(tz = name.as_str(), "timezone abbreviation registered");

        self.abbreviations.insert(name, tz);
    }

    /// Returns the timezone registered under `region`, such as
    /// `"Europe/Oslo"`.
    ///
    /// An error carrying the region name is returned if it is not registered.
    pub fn lookup_by_region(&self, region: &str) -> Result<SharedTzInfo, TzLookupError> {
        self.regions
            .get(region)
            .cloned()
            .ok_or_else(|| TzLookupError::RegionNotFound(region.into()))
    }

    /// Returns the timezone registered under the abbreviation `name`.
    pub fn lookup_by_abbreviation(&self, name: &str) -> Result<SharedTzInfo, TzLookupError> {
        self.abbreviations
            .get(name)
            .cloned()
            .ok_or_else(|| TzLookupError::AbbreviationNotFound(name.into()))
    }

    /// Registered region names, in lexicographic order.
    pub fn list_region_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.regions.keys().map(String::as_str)
    }

    /// Registered abbreviations, in lexicographic order.
    pub fn list_abbreviation_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.abbreviations.keys().map(String::as_str)
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns whether neither regions nor abbreviations are registered.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.abbreviations.is_empty()
    }
}
