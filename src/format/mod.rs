//! Output formatters
//!
//! Renders the outcome of a nearby-games search for the terminal.

pub mod json;
pub mod text;

use crate::constants::search::DATE_FORMAT;
use crate::discovery::GameResult;
use crate::error::Result;
use crate::nearby::SearchOutcome;
use crate::search::{SearchMode, SearchParameters};
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// What a finished search looks like to the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub mode: SearchMode,
    pub radius_km: u32,
    pub date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_sources: Vec<String>,
    pub games: Vec<GameResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchReport {
    pub fn new(params: &SearchParameters, outcome: &SearchOutcome) -> Self {
        Self {
            mode: params.mode(),
            radius_km: params.radius_km(),
            date: params.date().format(DATE_FORMAT).to_string(),
            link_sources: params.link_sources().to_vec(),
            games: outcome.games().to_vec(),
            error: outcome.error().map(|e| e.user_message()),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a search report
    fn format(&self, report: &SearchReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        Box::new(json::JsonFormatter) as Box<dyn OutputFormatter>,
        Box::new(text::TextFormatter),
    ]
    .iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::discovery::GameResult;
    use chrono::NaiveDate;

    pub(crate) fn sample_report() -> SearchReport {
        let params = SearchParameters::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let outcome = SearchOutcome::Results(vec![GameResult {
            id: "1".to_string(),
            title: "SG Hassendorf/Bötersen vs. SG Reeßum/Taaken".to_string(),
            venue_name: "Am weissen Moor".to_string(),
            start_time: "2024-06-01T15:00:00Z".to_string(),
            distance_km: 4.26,
            maps_url_ios: None,
            maps_url_android: Some("geo:53.2194,9.4083".to_string()),
        }]);
        SearchReport::new(&params, &outcome)
    }

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("TEXT").is_some());
        assert!(get_formatter("gpx").is_none());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 2);
        assert!(formats.iter().any(|f| f.name == "json"));
        assert!(formats.iter().any(|f| f.name == "text"));
    }

    #[test]
    fn test_report_from_outcome() {
        let report = sample_report();
        assert_eq!(report.date, "2024-06-01");
        assert_eq!(report.radius_km, 10);
        assert_eq!(report.games.len(), 1);
        assert!(report.error.is_none());
    }
}
