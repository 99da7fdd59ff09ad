//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/matchday/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::geo::{Coordinates, PermissionStatus};
use crate::maps::Platform;
use crate::search::{LocationSource, SearchMode, SearchParameters};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// External services
    #[serde(default)]
    pub api: ApiConfig,

    /// Initial search parameters
    #[serde(default)]
    pub search: SearchConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Maps deep-link settings
    #[serde(default)]
    pub maps: MapsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// External services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the nearby-games backend
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Base URL of the Nominatim instance
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,
}

/// Initial search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// "coordinate" or "link"
    #[serde(default = "default_mode")]
    pub mode: String,

    /// "device" or "manual"
    #[serde(default = "default_source")]
    pub source: String,

    /// Address used when source is "manual"
    #[serde(default)]
    pub address: String,

    /// fupa.net / fussball.de listing URLs for link mode
    #[serde(default)]
    pub link_sources: Vec<String>,

    /// Explicit center for link mode
    #[serde(default)]
    pub center_address: String,
}

/// Device location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// "ip" (ip-api.com lookup) or "fixed"
    #[serde(default = "default_location_provider")]
    pub provider: String,

    /// Standing answer to the location permission prompt
    #[serde(default = "default_permission")]
    pub permission: PermissionStatus,

    /// Position served by the "fixed" provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_lon: Option<f64>,
}

/// Maps deep-link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Which per-platform route URL to open ("ios" or "android")
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Command that opens URLs
    #[serde(default = "default_open_command")]
    pub open_command: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}
fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
fn default_location_provider() -> String {
    DEFAULT_LOCATION_PROVIDER.to_string()
}
fn default_permission() -> PermissionStatus {
    PermissionStatus::Granted
}
fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}
fn default_open_command() -> String {
    DEFAULT_OPEN_COMMAND.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            geocoder_url: default_geocoder_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            source: default_source(),
            address: String::new(),
            link_sources: Vec::new(),
            center_address: String::new(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: default_location_provider(),
            permission: default_permission(),
            fixed_lat: None,
            fixed_lon: None,
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            open_command: default_open_command(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn parse_permission(value: &str) -> Result<PermissionStatus> {
    match value.to_lowercase().as_str() {
        "granted" | "grant" | "true" => Ok(PermissionStatus::Granted),
        "denied" | "deny" | "false" => Ok(PermissionStatus::Denied),
        _ => Err(Error::Config(format!("Invalid permission value: {}", value))),
    }
}

fn parse_optional_f64(value: &str) -> Result<Option<f64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| Error::Config(format!("Invalid number: {}", value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key". Returns None for unknown keys; unset
    /// optional values come back as an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        let optional = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();

        match parts.as_slice() {
            ["api", "base_url"] => Some(self.api.base_url.clone()),
            ["api", "geocoder_url"] => Some(self.api.geocoder_url.clone()),

            ["search", "mode"] => Some(self.search.mode.clone()),
            ["search", "source"] => Some(self.search.source.clone()),
            ["search", "address"] => Some(self.search.address.clone()),
            ["search", "link_sources"] => Some(self.search.link_sources.join(",")),
            ["search", "center_address"] => Some(self.search.center_address.clone()),

            ["location", "provider"] => Some(self.location.provider.clone()),
            ["location", "permission"] => Some(match self.location.permission {
                PermissionStatus::Granted => "granted".to_string(),
                PermissionStatus::Denied => "denied".to_string(),
            }),
            ["location", "fixed_lat"] => Some(optional(self.location.fixed_lat)),
            ["location", "fixed_lon"] => Some(optional(self.location.fixed_lon)),

            ["maps", "platform"] => Some(self.maps.platform.clone()),
            ["maps", "open_command"] => Some(self.maps.open_command.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["api", "base_url"] => {
                self.api.base_url = value.to_string();
            }
            ["api", "geocoder_url"] => {
                self.api.geocoder_url = value.to_string();
            }

            ["search", "mode"] => {
                SearchMode::from_str(value).map_err(Error::Config)?;
                self.search.mode = value.to_lowercase();
            }
            ["search", "source"] => {
                LocationSource::from_str(value).map_err(Error::Config)?;
                self.search.source = value.to_lowercase();
            }
            ["search", "address"] => {
                self.search.address = value.to_string();
            }
            ["search", "link_sources"] => {
                self.search.link_sources = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ["search", "center_address"] => {
                self.search.center_address = value.to_string();
            }

            ["location", "provider"] => match value {
                "ip" | "fixed" => self.location.provider = value.to_string(),
                _ => {
                    return Err(Error::Config(format!(
                        "Invalid location provider: {} (expected ip or fixed)",
                        value
                    )))
                }
            },
            ["location", "permission"] => {
                self.location.permission = parse_permission(value)?;
            }
            ["location", "fixed_lat"] => {
                self.location.fixed_lat = parse_optional_f64(value)?;
            }
            ["location", "fixed_lon"] => {
                self.location.fixed_lon = parse_optional_f64(value)?;
            }

            ["maps", "platform"] => {
                Platform::from_str(value).map_err(Error::Config)?;
                self.maps.platform = value.to_lowercase();
            }
            ["maps", "open_command"] => {
                self.maps.open_command = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "api.base_url",
            "api.geocoder_url",
            "search.mode",
            "search.source",
            "search.address",
            "search.link_sources",
            "search.center_address",
            "location.provider",
            "location.permission",
            "location.fixed_lat",
            "location.fixed_lon",
            "maps.platform",
            "maps.open_command",
            "server.host",
            "server.port",
            "output.format",
        ]
    }

    /// Maps platform
    pub fn platform(&self) -> Result<Platform> {
        Platform::from_str(&self.maps.platform).map_err(Error::Config)
    }

    /// Configured fixed position, if both halves are set
    pub fn fixed_position(&self) -> Option<Coordinates> {
        match (self.location.fixed_lat, self.location.fixed_lon) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Initial search parameters, dated today
    pub fn search_parameters(&self) -> Result<SearchParameters> {
        let mode = SearchMode::from_str(&self.search.mode).map_err(Error::Config)?;
        let source = LocationSource::from_str(&self.search.source).map_err(Error::Config)?;

        let mut params = SearchParameters::default();
        params.set_mode(mode);
        params.set_source(source);
        params.set_manual_address(self.search.address.clone());
        params.set_link_sources(self.search.link_sources.clone());
        params.set_link_center_address(self.search.center_address.clone());
        Ok(params)
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.geocoder_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.search.mode, "coordinate");
        assert_eq!(config.location.permission, PermissionStatus::Granted);
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("search.mode"), Some("coordinate".to_string()));

        config.set("search.mode", "link").unwrap();
        assert_eq!(config.get("search.mode"), Some("link".to_string()));

        config
            .set(
                "search.link_sources",
                "https://www.fupa.net/region/rotenburg, https://www.fussball.de/a",
            )
            .unwrap();
        assert_eq!(config.search.link_sources.len(), 2);

        config.set("location.permission", "denied").unwrap();
        assert_eq!(config.location.permission, PermissionStatus::Denied);
        assert_eq!(config.get("location.permission"), Some("denied".to_string()));
    }

    #[test]
    fn test_fixed_position() {
        let mut config = Config::default();
        assert!(config.fixed_position().is_none());
        assert_eq!(config.get("location.fixed_lat"), Some(String::new()));

        config.set("location.fixed_lat", "53.2194").unwrap();
        assert!(config.fixed_position().is_none());

        config.set("location.fixed_lon", "9.4083").unwrap();
        assert_eq!(config.fixed_position(), Some(Coordinates::new(53.2194, 9.4083)));

        config.set("location.fixed_lat", "").unwrap();
        assert!(config.fixed_position().is_none());
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("search.mode", "radar").is_err());
        assert!(config.set("maps.platform", "symbian").is_err());
        assert!(config.set("location.provider", "gps").is_err());
        assert!(config.set("location.permission", "maybe").is_err());
    }

    #[test]
    fn test_search_parameters_from_config() {
        let mut config = Config::default();
        config.set("search.mode", "link").unwrap();
        config
            .set("search.link_sources", "https://www.fupa.net/region/rotenburg")
            .unwrap();

        let params = config.search_parameters().unwrap();
        assert_eq!(params.mode(), SearchMode::Link);
        assert_eq!(params.radius_km(), 25);
        assert_eq!(params.link_sources().len(), 1);
    }

    #[test]
    fn test_platform() {
        let mut config = Config::default();
        assert_eq!(config.platform().unwrap(), Platform::Android);
        config.set("maps.platform", "ios").unwrap();
        assert_eq!(config.platform().unwrap(), Platform::Ios);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("matchday").join("config.toml");

        let mut config = Config::default();
        config.set("search.address", "Am weissen Moor").unwrap();
        config.set("location.fixed_lat", "53.2").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.address, "Am weissen Moor");
        assert_eq!(loaded.location.fixed_lat, Some(53.2));
    }

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[api]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[location]"));
        assert!(toml.contains("permission = \"granted\""));
        assert!(!toml.contains("fixed_lat"));
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(Config::default().server_addr(), "127.0.0.1:7979");
    }

    #[test]
    fn test_available_keys_resolve() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }
}
