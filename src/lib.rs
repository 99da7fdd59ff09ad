//! matchday: amateur football community client
//!
//! A library and CLI for finding football games nearby and browsing a local
//! football community (feed, events, transfer market).
//!
//! ## Features
//!
//! - Nearby-games search around the device location, a geocoded address,
//!   or the clubs behind fussball.de / FuPa links
//! - Route links for the platform's maps application
//! - Community feed, events, transfers and search over an injected repository
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use matchday::search::{SearchMode, SearchParameters};
//! use chrono::NaiveDate;
//!
//! let mut params = SearchParameters::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
//! assert_eq!(params.radius_km(), 10);
//!
//! params.set_mode(SearchMode::Link);
//! params.add_link_source("https://www.fupa.net/club/tus-rotenburg");
//! let plan = params.plan().unwrap();
//! assert_eq!(plan.radius_km, 25);
//! ```

pub mod cli;
pub mod community;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod format;
pub mod geo;
pub mod maps;
pub mod nearby;
pub mod search;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use discovery::{GameResult, ResolvedQuery};
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use nearby::{NearbyGames, SearchOutcome};
pub use search::SearchParameters;
