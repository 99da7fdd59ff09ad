//! HTTP client for the nearby-games backend
//!
//! Issues one GET per search with no retry. The request always covers a
//! fixed window of three days either side of the selected date.

use crate::constants::api::{DISCOVERY_URL, NEARBY_GAMES_PATH, USER_AGENT};
use crate::constants::search::{DATE_FORMAT, DAYS_BACK, DAYS_FORWARD};
use crate::discovery::{ApiError, DiscoveryResponse, GameDiscovery, ResolvedQuery};
use crate::error::Result;
use tracing::{debug, warn};

/// Nearby-games API client
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    client: reqwest::Client,
    base_url: String,
}

impl DiscoveryClient {
    /// Create a client against the default backend
    pub fn new() -> Result<Self> {
        Self::with_base_url(DISCOVERY_URL)
    }

    /// Create a client against a specific backend
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the request URL for a query
    ///
    /// Parameter order is stable: `lat`, `lon`, `radiusKm`, `date`,
    /// `daysBack`, `daysForward`, then the optional source URLs.
    pub fn request_url(&self, query: &ResolvedQuery) -> String {
        let mut params = Vec::with_capacity(8);

        if let Some(coords) = &query.coordinates {
            params.push(format!("lat={}", coords.lat));
            params.push(format!("lon={}", coords.lng));
        }
        params.push(format!("radiusKm={}", query.radius_km));
        params.push(format!("date={}", query.date.format(DATE_FORMAT)));
        params.push(format!("daysBack={}", DAYS_BACK));
        params.push(format!("daysForward={}", DAYS_FORWARD));

        if let Some(url) = query.fussballde_source_url.as_deref().filter(|s| !s.is_empty()) {
            params.push(format!("fussballdeMatchkalender={}", urlencoding::encode(url)));
        }
        if let Some(urls) = query.fupa_source_urls.as_deref().filter(|s| !s.is_empty()) {
            params.push(format!("fupaUrl={}", urlencoding::encode(urls)));
        }

        format!("{}{}?{}", self.base_url, NEARBY_GAMES_PATH, params.join("&"))
    }
}

impl GameDiscovery for DiscoveryClient {
    async fn fetch_nearby_games(
        &self,
        query: &ResolvedQuery,
    ) -> std::result::Result<DiscoveryResponse, ApiError> {
        let url = self.request_url(query);
        debug!(%url, "fetching nearby games");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "nearby-games request failed");
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let parsed: DiscoveryResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

        debug!(
            games = parsed.games.len(),
            total = parsed.total_count,
            "nearby games received"
        );

        Ok(parsed)
    }
}
