//! Search outcomes and how failures are shown

use crate::constants::messages;
use crate::discovery::{ApiError, GameResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can stop a game search
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("no geocoding match for '{0}'")]
    GeocodeNotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("maps link unavailable: {0}")]
    MapsLinkUnavailable(String),

    #[error("{0}")]
    Validation(String),
}

/// Where a failure is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Non-blocking message above the list
    Inline,
    /// Modal alert
    Alert,
}

impl SearchError {
    pub fn presentation(&self) -> Presentation {
        match self {
            SearchError::PermissionDenied | SearchError::LocationUnavailable(_) => {
                Presentation::Inline
            }
            _ => Presentation::Alert,
        }
    }

    /// Text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            SearchError::PermissionDenied => messages::PERMISSION_DENIED.to_string(),
            SearchError::LocationUnavailable(_) => messages::LOCATION_UNAVAILABLE.to_string(),
            SearchError::GeocodeNotFound(_) => messages::GEOCODE_NOT_FOUND.to_string(),
            SearchError::Api(_) => messages::FETCH_FAILED.to_string(),
            SearchError::MapsLinkUnavailable(message) => message.clone(),
            SearchError::Validation(message) => message.clone(),
        }
    }
}

/// A modal alert waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: messages::ALERT_TITLE.to_string(),
            message: message.into(),
        }
    }
}

/// Result of one search invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<GameResult>),
    Empty,
    Error(SearchError),
    /// A newer search started (or the view closed) before this one finished
    Superseded,
}

impl SearchOutcome {
    pub fn games(&self) -> &[GameResult] {
        match self {
            SearchOutcome::Results(games) => games,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&SearchError> {
        match self {
            SearchOutcome::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_errors_are_inline() {
        assert_eq!(SearchError::PermissionDenied.presentation(), Presentation::Inline);
        assert_eq!(
            SearchError::LocationUnavailable("gps off".to_string()).presentation(),
            Presentation::Inline
        );
    }

    #[test]
    fn test_other_errors_alert() {
        let errors = [
            SearchError::GeocodeNotFound("x".to_string()),
            SearchError::Api(ApiError::Status(500)),
            SearchError::MapsLinkUnavailable("none".to_string()),
            SearchError::Validation("bad".to_string()),
        ];
        for error in errors {
            assert_eq!(error.presentation(), Presentation::Alert);
        }
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            SearchError::PermissionDenied.user_message(),
            "Location permission denied"
        );
        assert_eq!(
            SearchError::Api(ApiError::Parse("eof".to_string())).user_message(),
            "Failed to fetch nearby games. Please try again."
        );
        assert_eq!(
            SearchError::Validation("Radius 7 km is not offered".to_string()).user_message(),
            "Radius 7 km is not offered"
        );
    }

    #[test]
    fn test_alert_title() {
        let alert = Alert::error("boom");
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "boom");
    }
}
