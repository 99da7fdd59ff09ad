//! Centralized constants for the matchday crate
//!
//! Values shared by more than one module live here.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Game discovery backend
    pub const DISCOVERY_URL: &str = "https://same-b5pavypb5bj-latest.netlify.app";

    /// Path of the nearby-games endpoint on the discovery backend
    pub const NEARBY_GAMES_PATH: &str = "/api/nearby-games";

    /// User agent sent to every external service (Nominatim rejects anonymous clients)
    pub const USER_AGENT: &str = concat!("matchday/", env!("CARGO_PKG_VERSION"));
}

/// Game search policy
pub mod search {
    /// Radius choices offered to the user, in kilometers
    pub const RADIUS_OPTIONS_KM: [u32; 7] = [1, 5, 10, 25, 50, 75, 100];

    /// Default radius for coordinate-based search
    pub const COORDINATE_DEFAULT_RADIUS_KM: u32 = 10;

    /// Default radius for link-based search
    pub const LINK_DEFAULT_RADIUS_KM: u32 = 25;

    /// Days searched before the selected date
    pub const DAYS_BACK: u32 = 3;

    /// Days searched after the selected date
    pub const DAYS_FORWARD: u32 = 3;

    /// Date format used on the wire and in user input
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// User-facing messages
pub mod messages {
    pub const ALERT_TITLE: &str = "Error";
    pub const PERMISSION_DENIED: &str = "Location permission denied";
    pub const LOCATION_UNAVAILABLE: &str = "Failed to get current location";
    pub const GEOCODE_NOT_FOUND: &str = "Could not find location for the entered address";
    pub const FETCH_FAILED: &str = "Failed to fetch nearby games. Please try again.";
    pub const MAPS_URL_MISSING: &str = "Maps URL not available for this game";
    pub const MAPS_OPEN_FAILED: &str = "Could not open maps application";
    pub const NO_GAMES: &str = "No games found in this area.\nTry adjusting the radius or date.";
}
