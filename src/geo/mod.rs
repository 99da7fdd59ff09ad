//! Geocoding and device location
//!
//! Provides forward geocoding (address to coordinates) and the device
//! position query used by coordinate-based game search.

pub mod fixed;
pub mod ip_location;
pub mod nominatim;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::Geo(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::Geo(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Parse "lat,lng" as typed on the command line
    pub fn parse_pair(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| Error::Validation(format!("Expected LAT,LON but got '{}'", s)))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("Invalid longitude: {}", lng)))?;
        let coords = Self::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }
}

/// A geocoded location result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

impl GeoLocation {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the best match for the query, `Ok(None)` when the service has
    /// no match, and `Err` when the service could not be reached or answered
    /// with something unreadable.
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Option<GeoLocation>>> + Send;
}

/// Outcome of asking the platform for location access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Requested position accuracy
///
/// Results are bucketed into kilometer radii, so `Balanced` is what the
/// game search asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Lowest,
    Balanced,
    High,
}

/// Platform geolocation service
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground location permission
    fn request_permission(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// Query the current position
    fn current_position(&self, accuracy: Accuracy) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// Why the device position could not be determined
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Device location wrapper used by the game search
///
/// Permission is requested on every call; a previous grant is never reused.
#[derive(Debug, Clone)]
pub struct DeviceLocator<P> {
    provider: P,
}

impl<P: LocationProvider> DeviceLocator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Request permission, then query the position at balanced accuracy
    pub async fn current_coordinates(&self) -> std::result::Result<Coordinates, LocationError> {
        match self.provider.request_permission().await {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => {
                debug!("location permission denied");
                return Err(LocationError::PermissionDenied);
            }
        }

        let coords = self
            .provider
            .current_position(Accuracy::Balanced)
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        coords
            .validate()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        Ok(coords)
    }
}

/// Location provider selected by configuration
#[derive(Debug)]
pub enum ConfiguredLocation {
    Ip(ip_location::IpLocator),
    Fixed(fixed::FixedLocation),
}

impl LocationProvider for ConfiguredLocation {
    async fn request_permission(&self) -> PermissionStatus {
        match self {
            ConfiguredLocation::Ip(p) => p.request_permission().await,
            ConfiguredLocation::Fixed(p) => p.request_permission().await,
        }
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates> {
        match self {
            ConfiguredLocation::Ip(p) => p.current_position(accuracy).await,
            ConfiguredLocation::Fixed(p) => p.current_position(accuracy).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::FixedLocation;

    #[test]
    fn test_coordinates_validate() {
        assert!(Coordinates::new(52.52, 13.405).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_parse_pair() {
        let coords = Coordinates::parse_pair("52.52, 13.405").unwrap();
        assert_eq!(coords, Coordinates::new(52.52, 13.405));

        assert!(Coordinates::parse_pair("52.52").is_err());
        assert!(Coordinates::parse_pair("abc,13.4").is_err());
        assert!(Coordinates::parse_pair("95,13.4").is_err());
    }

    #[test]
    fn test_geo_location_serialization() {
        let loc = GeoLocation {
            lat: 53.1139,
            lng: 9.3975,
            display_name: "Rotenburg (Wümme)".to_string(),
        };

        let json = serde_json::to_string(&loc).unwrap();
        let parsed: GeoLocation = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.lat, 53.1139);
        assert_eq!(parsed.coords(), Coordinates::new(53.1139, 9.3975));
    }

    #[tokio::test]
    async fn test_device_locator_granted() {
        let locator = DeviceLocator::new(FixedLocation::granted(Coordinates::new(52.52, 13.405)));
        let coords = locator.current_coordinates().await.unwrap();
        assert_eq!(coords, Coordinates::new(52.52, 13.405));
    }

    #[tokio::test]
    async fn test_device_locator_denied() {
        let locator = DeviceLocator::new(FixedLocation::denied());
        assert_eq!(
            locator.current_coordinates().await,
            Err(LocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_device_locator_unavailable() {
        let locator = DeviceLocator::new(FixedLocation::unavailable());
        let err = locator.current_coordinates().await.unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_device_locator_requests_permission_every_call() {
        let locator = DeviceLocator::new(FixedLocation::granted(Coordinates::new(1.0, 2.0)));
        locator.current_coordinates().await.unwrap();
        locator.current_coordinates().await.unwrap();
        assert_eq!(locator.provider().permission_requests(), 2);
    }
}
