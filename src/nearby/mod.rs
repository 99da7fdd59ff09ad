//! Nearby-games session
//!
//! Headless counterpart of the "Nearby Games" screen: owns the search
//! parameters and the displayed state, runs the resolve-then-fetch chain,
//! and turns failures into inline messages or alerts.
//!
//! Every search takes a generation token. Only the search holding the latest
//! token may touch the displayed state; older responses are dropped, and
//! [`NearbyGames::dismiss`] invalidates whatever is still in flight.

pub mod outcome;

use crate::constants::messages;
use crate::discovery::{GameDiscovery, GameResult};
use crate::error::Error;
use crate::geo::{Coordinates, DeviceLocator, GeoBackend, LocationError, LocationProvider};
use crate::maps::{MapsLauncher, Platform};
use crate::search::{CenterResolution, SearchParameters};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub use outcome::{Alert, Presentation, SearchError, SearchOutcome};

/// What the screen currently displays
#[derive(Debug, Default)]
struct ViewState {
    loading: bool,
    shown: bool,
    games: Vec<GameResult>,
    inline_error: Option<String>,
    alerts: Vec<Alert>,
    last_outcome: Option<SearchOutcome>,
}

/// Nearby-games search session
pub struct NearbyGames<G, L, D> {
    geocoder: G,
    locator: DeviceLocator<L>,
    discovery: D,
    launcher: Box<dyn MapsLauncher>,
    platform: Platform,
    params: Mutex<SearchParameters>,
    state: Mutex<ViewState>,
    generation: AtomicU64,
}

impl<G, L, D> NearbyGames<G, L, D>
where
    G: GeoBackend,
    L: LocationProvider,
    D: GameDiscovery,
{
    pub fn new(
        geocoder: G,
        location: L,
        discovery: D,
        launcher: Box<dyn MapsLauncher>,
        platform: Platform,
        params: SearchParameters,
    ) -> Self {
        Self {
            geocoder,
            locator: DeviceLocator::new(location),
            discovery,
            launcher,
            platform,
            params: Mutex::new(params),
            state: Mutex::new(ViewState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn params_guard(&self) -> MutexGuard<'_, SearchParameters> {
        self.params.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current parameters
    pub fn params(&self) -> SearchParameters {
        self.params_guard().clone()
    }

    /// Edit the parameters; takes effect on the next search
    pub fn update_params<R>(&self, f: impl FnOnce(&mut SearchParameters) -> R) -> R {
        f(&mut self.params_guard())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn games(&self) -> Vec<GameResult> {
        self.state().games.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn inline_error(&self) -> Option<String> {
        self.state().inline_error.clone()
    }

    pub fn last_outcome(&self) -> Option<SearchOutcome> {
        self.state().last_outcome.clone()
    }

    /// Drain alerts queued since the last call
    pub fn take_alerts(&self) -> Vec<Alert> {
        std::mem::take(&mut self.state().alerts)
    }

    /// Empty-state text, when the list is empty and nothing is loading
    pub fn message(&self) -> Option<&'static str> {
        let state = self.state();
        if state.games.is_empty() && !state.loading {
            Some(messages::NO_GAMES)
        } else {
            None
        }
    }

    /// First display of the view: runs the initial search exactly once
    pub async fn show(&self) -> Option<SearchOutcome> {
        {
            let mut state = self.state();
            if state.shown {
                return None;
            }
            state.shown = true;
        }
        Some(self.search().await)
    }

    /// Close the view; responses still in flight are discarded
    pub fn dismiss(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        state.loading = false;
        state.shown = false;
        debug!("nearby games view dismissed");
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Run a search with the current parameters
    pub async fn search(&self) -> SearchOutcome {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state().inline_error = None;

        let plan = match self.params_guard().plan() {
            Ok(plan) => plan,
            Err(e) => return self.finish(token, SearchOutcome::Error(validation_error(e))),
        };

        self.state().loading = true;
        debug!(token, center = ?plan.center, radius_km = plan.radius_km, "search started");

        let coordinates = match self.resolve_center(&plan.center).await {
            Ok(coordinates) => coordinates,
            Err(e) => return self.finish(token, SearchOutcome::Error(e)),
        };

        if !self.is_current(token) {
            debug!(token, "search superseded before fetch");
            return SearchOutcome::Superseded;
        }

        let query = plan.into_query(coordinates);
        if let Err(e) = query.validate() {
            return self.finish(token, SearchOutcome::Error(validation_error(e)));
        }

        let outcome = match self.discovery.fetch_nearby_games(&query).await {
            Ok(response) if response.games.is_empty() => SearchOutcome::Empty,
            Ok(response) => SearchOutcome::Results(response.games),
            Err(e) => {
                warn!(error = %e, "failed to fetch nearby games");
                SearchOutcome::Error(SearchError::Api(e))
            }
        };

        self.finish(token, outcome)
    }

    async fn resolve_center(
        &self,
        center: &CenterResolution,
    ) -> Result<Option<Coordinates>, SearchError> {
        match center {
            CenterResolution::Device => match self.locator.current_coordinates().await {
                Ok(coords) => Ok(Some(coords)),
                Err(LocationError::PermissionDenied) => Err(SearchError::PermissionDenied),
                Err(LocationError::Unavailable(reason)) => {
                    warn!(%reason, "device location unavailable");
                    Err(SearchError::LocationUnavailable(reason))
                }
            },
            CenterResolution::Address(address) => match self.geocoder.geocode(address).await {
                Ok(Some(location)) => {
                    debug!(%address, found = %location.display_name, "address geocoded");
                    Ok(Some(location.coords()))
                }
                Ok(None) => Err(SearchError::GeocodeNotFound(address.clone())),
                Err(e) => {
                    // Shown to the user exactly like a missing match
                    warn!(%address, error = %e, "geocoder unreachable");
                    Err(SearchError::GeocodeNotFound(address.clone()))
                }
            },
            CenterResolution::RegionKeyword(keyword) => match self.geocoder.geocode(keyword).await {
                Ok(Some(location)) => Ok(Some(location.coords())),
                Ok(None) => {
                    debug!(%keyword, "region keyword not found, searching by links only");
                    Ok(None)
                }
                Err(e) => {
                    debug!(%keyword, error = %e, "region keyword lookup failed, searching by links only");
                    Ok(None)
                }
            },
            CenterResolution::Omitted => Ok(None),
        }
    }

    /// Apply an outcome to the view if `token` is still the latest search
    fn finish(&self, token: u64, outcome: SearchOutcome) -> SearchOutcome {
        let mut state = self.state();

        if !self.is_current(token) {
            debug!(token, "discarding stale search response");
            return SearchOutcome::Superseded;
        }

        state.loading = false;
        match &outcome {
            SearchOutcome::Results(games) => {
                info!(count = games.len(), "nearby games found");
                state.games = games.clone();
                state.inline_error = None;
            }
            SearchOutcome::Empty => {
                state.games.clear();
                state.inline_error = None;
            }
            SearchOutcome::Error(e) => {
                state.games.clear();
                match e.presentation() {
                    Presentation::Inline => state.inline_error = Some(e.user_message()),
                    Presentation::Alert => state.alerts.push(Alert::error(e.user_message())),
                }
            }
            SearchOutcome::Superseded => {}
        }
        state.last_outcome = Some(outcome.clone());

        outcome
    }

    /// Open the route to a listed game in the platform's maps app
    pub fn open_route(&self, game_id: &str) -> Result<(), SearchError> {
        let url = {
            let state = self.state();
            state
                .games
                .iter()
                .find(|g| g.id == game_id)
                .and_then(|g| g.maps_url(self.platform))
                .map(str::to_string)
        };

        let result = match url {
            None => Err(SearchError::MapsLinkUnavailable(
                messages::MAPS_URL_MISSING.to_string(),
            )),
            Some(url) => self.launcher.open(&url).map_err(|e| {
                warn!(error = %e, "failed to open maps");
                SearchError::MapsLinkUnavailable(messages::MAPS_OPEN_FAILED.to_string())
            }),
        };

        if let Err(e) = &result {
            self.state().alerts.push(Alert::error(e.user_message()));
        }
        result
    }
}

fn validation_error(e: Error) -> SearchError {
    match e {
        Error::Validation(message) => SearchError::Validation(message),
        other => SearchError::Validation(other.to_string()),
    }
}
