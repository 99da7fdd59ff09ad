//! IP-based geolocation
//!
//! Desktop stand-in for the phone's GPS: resolves the machine's approximate
//! position through ip-api.com. Nothing is cached; every search asks again.

use crate::constants::api::{IP_API_URL, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::{Accuracy, Coordinates, LocationProvider, PermissionStatus};
use serde::Deserialize;
use tracing::debug;

/// IP location service
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
    permission: PermissionStatus,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpLocator {
    /// Create a locator against ip-api.com
    ///
    /// `permission` is the user's standing answer to the location prompt,
    /// taken from the config file.
    pub fn new(permission: PermissionStatus) -> Result<Self> {
        Self::with_url(IP_API_URL, permission)
    }

    /// Create a locator against a specific endpoint
    pub fn with_url(url: impl Into<String>, permission: PermissionStatus) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            url: url.into(),
            permission,
        })
    }

    /// Fetch location from ip-api.com
    async fn fetch_location(&self) -> Result<Coordinates> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Geo("IP location lookup failed".to_string()));
        }

        let lat = data.lat.ok_or_else(|| Error::Geo("No latitude in response".to_string()))?;
        let lng = data.lon.ok_or_else(|| Error::Geo("No longitude in response".to_string()))?;

        debug!(city = ?data.city, lat, lng, "resolved IP location");

        Ok(Coordinates::new(lat, lng))
    }
}

impl LocationProvider for IpLocator {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates> {
        // IP lookups have a single (city level) precision
        debug!(?accuracy, "querying IP location");
        self.fetch_location().await
    }
}
