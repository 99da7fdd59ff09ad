//! Search parameters for nearby-games discovery
//!
//! Holds the user's input (mode, radius, date, addresses, link sources) and
//! turns it into a [`SearchPlan`]: which center to resolve and what to send
//! to the backend once it is resolved.

pub mod links;

use crate::constants::search::{
    COORDINATE_DEFAULT_RADIUS_KM, DATE_FORMAT, LINK_DEFAULT_RADIUS_KM, RADIUS_OPTIONS_KM,
};
use crate::discovery::ResolvedQuery;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use chrono::{Local, NaiveDate};
use links::{region_keyword, ClassifiedLinks};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the search scope is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Point plus radius
    #[default]
    Coordinate,
    /// External listing URLs
    Link,
}

impl SearchMode {
    /// Radius a mode starts with
    pub fn default_radius_km(self) -> u32 {
        match self {
            SearchMode::Coordinate => COORDINATE_DEFAULT_RADIUS_KM,
            SearchMode::Link => LINK_DEFAULT_RADIUS_KM,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SearchMode::Coordinate => SearchMode::Link,
            SearchMode::Link => SearchMode::Coordinate,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Coordinate => write!(f, "coordinate"),
            SearchMode::Link => write!(f, "link"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coordinate" | "coordinates" | "gps" => Ok(SearchMode::Coordinate),
            "link" | "links" => Ok(SearchMode::Link),
            _ => Err(format!("Unknown search mode: {}", s)),
        }
    }
}

/// Where coordinate mode gets its center from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    #[default]
    Device,
    Manual,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::Device => write!(f, "device"),
            LocationSource::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for LocationSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "device" | "gps" => Ok(LocationSource::Device),
            "manual" | "address" => Ok(LocationSource::Manual),
            _ => Err(format!("Unknown location source: {}", s)),
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// How the search center gets resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CenterResolution {
    /// Ask the device; failure aborts the search
    Device,
    /// Geocode a user-entered address; failure aborts the search
    Address(String),
    /// Geocode a keyword guessed from a link; failure drops the center
    RegionKeyword(String),
    /// Search by links only
    Omitted,
}

/// Everything needed to run one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub center: CenterResolution,
    pub radius_km: u32,
    pub date: NaiveDate,
    pub links: ClassifiedLinks,
}

impl SearchPlan {
    /// Build the backend query once the center is known
    pub fn into_query(self, coordinates: Option<Coordinates>) -> ResolvedQuery {
        let fupa_source_urls = self.links.fupa_joined();
        ResolvedQuery {
            coordinates,
            radius_km: self.radius_km,
            date: self.date,
            fussballde_source_url: self.links.fussballde,
            fupa_source_urls,
        }
    }
}

/// User-editable search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    mode: SearchMode,
    source: LocationSource,
    radius_km: u32,
    /// Set once the user picks a radius; mode switches then keep it
    radius_overridden: bool,
    date: NaiveDate,
    manual_address: String,
    link_sources: Vec<String>,
    link_center_address: String,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl SearchParameters {
    /// Coordinate mode, device location, default radius, given date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: SearchMode::Coordinate,
            source: LocationSource::Device,
            radius_km: SearchMode::Coordinate.default_radius_km(),
            radius_overridden: false,
            date,
            manual_address: String::new(),
            link_sources: Vec::new(),
            link_center_address: String::new(),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Switch mode, resetting the radius unless the user chose one
    pub fn set_mode(&mut self, mode: SearchMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        if !self.radius_overridden {
            self.radius_km = mode.default_radius_km();
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn source(&self) -> LocationSource {
        self.source
    }

    pub fn set_source(&mut self, source: LocationSource) {
        self.source = source;
    }

    pub fn toggle_source(&mut self) {
        self.source = match self.source {
            LocationSource::Device => LocationSource::Manual,
            LocationSource::Manual => LocationSource::Device,
        };
    }

    pub fn radius_km(&self) -> u32 {
        self.radius_km
    }

    pub fn radius_overridden(&self) -> bool {
        self.radius_overridden
    }

    /// Pick one of the offered radii
    pub fn set_radius(&mut self, radius_km: u32) -> Result<()> {
        if !RADIUS_OPTIONS_KM.contains(&radius_km) {
            return Err(Error::Validation(format!(
                "Radius {} km is not one of {:?}",
                radius_km, RADIUS_OPTIONS_KM
            )));
        }
        self.radius_km = radius_km;
        self.radius_overridden = true;
        Ok(())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Set the date from `YYYY-MM-DD` text
    pub fn set_date_str(&mut self, s: &str) -> Result<()> {
        self.date = parse_date(s)?;
        Ok(())
    }

    pub fn manual_address(&self) -> &str {
        &self.manual_address
    }

    pub fn set_manual_address(&mut self, address: impl Into<String>) {
        self.manual_address = address.into();
    }

    pub fn link_sources(&self) -> &[String] {
        &self.link_sources
    }

    pub fn set_link_sources(&mut self, sources: Vec<String>) {
        self.link_sources = sources;
    }

    pub fn add_link_source(&mut self, source: impl Into<String>) {
        self.link_sources.push(source.into());
    }

    pub fn link_center_address(&self) -> &str {
        &self.link_center_address
    }

    pub fn set_link_center_address(&mut self, address: impl Into<String>) {
        self.link_center_address = address.into();
    }

    /// Validate the input and decide how the center gets resolved
    ///
    /// Nothing here touches the network, so a rejected plan never reaches
    /// the geocoder or the backend.
    pub fn plan(&self) -> Result<SearchPlan> {
        match self.mode {
            SearchMode::Coordinate => {
                let address = self.manual_address.trim();
                // A blank manual address falls back to the device position
                let center = if self.source == LocationSource::Manual && !address.is_empty() {
                    CenterResolution::Address(address.to_string())
                } else {
                    CenterResolution::Device
                };

                Ok(SearchPlan {
                    center,
                    radius_km: self.radius_km,
                    date: self.date,
                    links: ClassifiedLinks::default(),
                })
            }
            SearchMode::Link => {
                let links = ClassifiedLinks::from_sources(&self.link_sources)?;
                if links.is_empty() {
                    return Err(Error::Validation(
                        "Add at least one fupa.net or fussball.de link to search by links"
                            .to_string(),
                    ));
                }

                let center_address = self.link_center_address.trim();
                let center = if !center_address.is_empty() {
                    CenterResolution::Address(center_address.to_string())
                } else {
                    self.link_sources
                        .iter()
                        .find(|s| !s.trim().is_empty())
                        .and_then(|first| region_keyword(first))
                        .map(CenterResolution::RegionKeyword)
                        .unwrap_or(CenterResolution::Omitted)
                };

                Ok(SearchPlan {
                    center,
                    radius_km: self.radius_km,
                    date: self.date,
                    links,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_defaults() {
        let params = SearchParameters::new(june_first());
        assert_eq!(params.mode(), SearchMode::Coordinate);
        assert_eq!(params.source(), LocationSource::Device);
        assert_eq!(params.radius_km(), 10);
        assert_eq!(params.date(), june_first());
    }

    #[test]
    fn test_default_date_is_today() {
        let params = SearchParameters::default();
        assert_eq!(params.date(), Local::now().date_naive());
    }

    #[test]
    fn test_mode_switch_resets_radius() {
        let mut params = SearchParameters::new(june_first());

        params.set_mode(SearchMode::Link);
        assert_eq!(params.radius_km(), 25);

        params.set_mode(SearchMode::Coordinate);
        assert_eq!(params.radius_km(), 10);

        params.toggle_mode();
        assert_eq!(params.mode(), SearchMode::Link);
        assert_eq!(params.radius_km(), 25);
    }

    #[test]
    fn test_mode_switch_keeps_user_radius() {
        let mut params = SearchParameters::new(june_first());
        params.set_radius(50).unwrap();

        params.set_mode(SearchMode::Link);
        assert_eq!(params.radius_km(), 50);

        params.set_mode(SearchMode::Coordinate);
        assert_eq!(params.radius_km(), 50);
    }

    #[test]
    fn test_set_radius_rejects_unlisted_value() {
        let mut params = SearchParameters::new(june_first());
        assert!(params.set_radius(7).is_err());
        assert_eq!(params.radius_km(), 10);
        assert!(!params.radius_overridden());

        for radius in RADIUS_OPTIONS_KM {
            params.set_radius(radius).unwrap();
            assert_eq!(params.radius_km(), radius);
        }
    }

    #[test]
    fn test_set_date_str() {
        let mut params = SearchParameters::new(june_first());
        params.set_date_str("2024-06-15").unwrap();
        assert_eq!(params.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        assert!(params.set_date_str("15.06.2024").is_err());
        assert!(params.set_date_str("2024-02-30").is_err());
        assert_eq!(params.date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_plan_device() {
        let params = SearchParameters::new(june_first());
        let plan = params.plan().unwrap();
        assert_eq!(plan.center, CenterResolution::Device);
        assert!(plan.links.is_empty());
    }

    #[test]
    fn test_plan_manual_address() {
        let mut params = SearchParameters::new(june_first());
        params.set_source(LocationSource::Manual);
        params.set_manual_address("  Am weissen Moor, Hassendorf ");

        let plan = params.plan().unwrap();
        assert_eq!(
            plan.center,
            CenterResolution::Address("Am weissen Moor, Hassendorf".to_string())
        );
    }

    #[test]
    fn test_plan_blank_manual_address_uses_device() {
        let mut params = SearchParameters::new(june_first());
        params.toggle_source();
        params.set_manual_address("   ");
        assert_eq!(params.plan().unwrap().center, CenterResolution::Device);
    }

    #[test]
    fn test_plan_link_mode_requires_sources() {
        let mut params = SearchParameters::new(june_first());
        params.set_mode(SearchMode::Link);
        assert!(matches!(params.plan(), Err(Error::Validation(_))));

        params.set_link_sources(vec!["  ".to_string()]);
        assert!(matches!(params.plan(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_plan_link_mode_region_keyword() {
        let mut params = SearchParameters::new(june_first());
        params.set_mode(SearchMode::Link);
        params.add_link_source("https://www.fupa.net/region/rotenburg/transfers");

        let plan = params.plan().unwrap();
        assert_eq!(plan.center, CenterResolution::RegionKeyword("rotenburg".to_string()));
        assert_eq!(plan.radius_km, 25);
    }

    #[test]
    fn test_plan_link_mode_center_address_wins() {
        let mut params = SearchParameters::new(june_first());
        params.set_mode(SearchMode::Link);
        params.add_link_source("https://www.fupa.net/region/rotenburg");
        params.set_link_center_address("Scheeßel");

        assert_eq!(
            params.plan().unwrap().center,
            CenterResolution::Address("Scheeßel".to_string())
        );
    }

    #[test]
    fn test_plan_link_mode_without_region() {
        let mut params = SearchParameters::new(june_first());
        params.set_mode(SearchMode::Link);
        params.add_link_source("https://www.fussball.de/verein/tus-rotenburg");

        let plan = params.plan().unwrap();
        assert_eq!(plan.center, CenterResolution::Omitted);

        let query = plan.into_query(None);
        assert_eq!(
            query.fussballde_source_url.as_deref(),
            Some("https://www.fussball.de/verein/tus-rotenburg")
        );
        assert!(query.fupa_source_urls.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_plan_link_mode_rejects_unknown_host() {
        let mut params = SearchParameters::new(june_first());
        params.set_mode(SearchMode::Link);
        params.add_link_source("https://example.com/region/x");
        assert!(params.plan().is_err());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(SearchMode::from_str("link").unwrap(), SearchMode::Link);
        assert_eq!(SearchMode::from_str("GPS").unwrap(), SearchMode::Coordinate);
        assert!(SearchMode::from_str("radar").is_err());
        assert_eq!(LocationSource::from_str("manual").unwrap(), LocationSource::Manual);
    }
}
