//! Fixed-position location provider
//!
//! Serves a position given on the command line or in the config file.

use crate::error::{Error, Result};
use crate::geo::{Accuracy, Coordinates, LocationProvider, PermissionStatus};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Location provider with a preset answer
#[derive(Debug)]
pub struct FixedLocation {
    position: Option<Coordinates>,
    permission: PermissionStatus,
    permission_requests: AtomicUsize,
}

impl FixedLocation {
    pub fn new(position: Option<Coordinates>, permission: PermissionStatus) -> Self {
        Self {
            position,
            permission,
            permission_requests: AtomicUsize::new(0),
        }
    }

    /// Permission granted, position known
    pub fn granted(position: Coordinates) -> Self {
        Self::new(Some(position), PermissionStatus::Granted)
    }

    /// Permission refused
    pub fn denied() -> Self {
        Self::new(None, PermissionStatus::Denied)
    }

    /// Permission granted but no position can be determined
    pub fn unavailable() -> Self {
        Self::new(None, PermissionStatus::Granted)
    }

    /// Number of times permission has been requested
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

impl LocationProvider for FixedLocation {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates> {
        self.position
            .ok_or_else(|| Error::Geo("No position configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_position() {
        let provider = FixedLocation::granted(Coordinates::new(53.2194, 9.4083));
        assert_eq!(provider.request_permission().await, PermissionStatus::Granted);
        let coords = provider.current_position(Accuracy::Balanced).await.unwrap();
        assert_eq!(coords.lat, 53.2194);
    }

    #[tokio::test]
    async fn test_unavailable_position() {
        let provider = FixedLocation::unavailable();
        assert!(provider.current_position(Accuracy::High).await.is_err());
    }
}
