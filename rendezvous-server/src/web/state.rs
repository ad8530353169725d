//! Application state for the web layer.

use std::sync::Arc;

use crate::amadeus::AmadeusBackend;
use crate::cache::CachedOfferSource;
use crate::planner::Planner;

/// Planner over the cached provider backend.
pub type AppPlanner = Planner<CachedOfferSource<AmadeusBackend>>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Destination planner, with its configuration and offer cache
    pub planner: Arc<AppPlanner>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: AppPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}
