//! Server shared state
//!
//! Holds the community repository handed to every handler.

use crate::community::{CommunityRepository, InMemoryRepository};
use std::sync::Arc;

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    /// Community data for this server's lifetime
    pub repo: Arc<dyn CommunityRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CommunityRepository>) -> Self {
        Self { repo }
    }

    /// State backed by the seeded in-memory community
    pub fn seeded() -> Self {
        Self::new(Arc::new(InMemoryRepository::seeded()))
    }
}
