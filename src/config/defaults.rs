//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api;

/// Default game discovery backend
pub const DEFAULT_API_BASE_URL: &str = api::DISCOVERY_URL;

/// Default geocoder
pub const DEFAULT_GEOCODER_URL: &str = api::NOMINATIM_URL;

/// Default search mode
pub const DEFAULT_MODE: &str = "coordinate";

/// Default coordinate source
pub const DEFAULT_SOURCE: &str = "device";

/// Default location provider
pub const DEFAULT_LOCATION_PROVIDER: &str = "ip";

/// Default maps platform
pub const DEFAULT_PLATFORM: &str = "android";

/// Default command used to open maps links
pub const DEFAULT_OPEN_COMMAND: &str = if cfg!(target_os = "macos") {
    "open"
} else {
    "xdg-open"
};

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "matchday";
