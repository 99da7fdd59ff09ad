//! Remote game discovery
//!
//! Types exchanged with the nearby-games backend and the trait the search
//! session uses to reach it. Matching, distance computation and scraping of
//! fupa.net / fussball.de all happen on the backend.

pub mod client;

use crate::constants::search::DATE_FORMAT;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::maps::Platform;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::future::Future;
use thiserror::Error;

pub use client::DiscoveryClient;

/// A game returned by the discovery backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Unique within one response
    pub id: String,
    pub title: String,
    pub venue_name: String,
    /// Kickoff as an ISO-8601 string
    #[serde(rename = "startTime", alias = "startTimeISO")]
    pub start_time: String,
    /// Distance from the search center in kilometers
    #[serde(rename = "distance", alias = "distanceKm")]
    pub distance_km: f64,
    #[serde(
        rename = "mapsUrlApple",
        alias = "mapsUrlIOS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub maps_url_ios: Option<String>,
    #[serde(
        rename = "mapsUrlGoogle",
        alias = "mapsUrlAndroid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub maps_url_android: Option<String>,
}

impl GameResult {
    /// Maps deep link for the given platform
    pub fn maps_url(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Ios => self.maps_url_ios.as_deref(),
            Platform::Android => self.maps_url_android.as_deref(),
        }
    }
}

/// Body of a nearby-games response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub games: Vec<GameResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fully resolved query sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub radius_km: u32,
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fussballde_source_url: Option<String>,
    /// Comma-joined fupa.net URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fupa_source_urls: Option<String>,
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&date.format(DATE_FORMAT).to_string())
}

impl ResolvedQuery {
    /// Query scoped by a point and radius
    pub fn at(coordinates: Coordinates, radius_km: u32, date: NaiveDate) -> Self {
        Self {
            coordinates: Some(coordinates),
            radius_km,
            date,
            fussballde_source_url: None,
            fupa_source_urls: None,
        }
    }

    /// A query needs a center point or at least one source URL
    pub fn validate(&self) -> Result<()> {
        let has_source = self
            .fussballde_source_url
            .as_deref()
            .is_some_and(|s| !s.is_empty())
            || self
                .fupa_source_urls
                .as_deref()
                .is_some_and(|s| !s.is_empty());

        if self.coordinates.is_none() && !has_source {
            return Err(Error::Validation(
                "A search needs coordinates or at least one source URL".to_string(),
            ));
        }
        if let Some(coords) = &self.coordinates {
            coords.validate()?;
        }
        Ok(())
    }
}

/// Failure talking to the discovery backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("API error: {0}")]
    Status(u16),

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("API request failed: {0}")]
    Transport(String),
}

/// Trait for game discovery backends
pub trait GameDiscovery: Send + Sync {
    /// Fetch games around the query's scope
    fn fetch_nearby_games(
        &self,
        query: &ResolvedQuery,
    ) -> impl Future<Output = std::result::Result<DiscoveryResponse, ApiError>> + Send;
}
