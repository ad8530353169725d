use std::error::Error;
use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rendezvous_server::amadeus::{AmadeusBackend, AmadeusClient, AmadeusConfig, MockAmadeusClient};
use rendezvous_server::cache::{CacheConfig, CachedOfferSource};
use rendezvous_server::domain::IataCode;
use rendezvous_server::planner::{Planner, PlannerConfig};
use rendezvous_server::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG_FILTER: &str = "rendezvous_server=info,tower_http=info";

/// Read a non-empty environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `RENDEZVOUS_DESTINATIONS` (comma separated airport codes).
fn destinations_from_env() -> Result<Vec<IataCode>, Box<dyn Error>> {
    let Some(raw) = env_var("RENDEZVOUS_DESTINATIONS") else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            IataCode::parse_normalized(s).map_err(|e| -> Box<dyn Error> {
                format!("RENDEZVOUS_DESTINATIONS: {e}").into()
            })
        })
        .collect()
}

/// Pick fixture data when `AMADEUS_MOCK_DIR` is set, the live API otherwise.
fn backend_from_env() -> Result<AmadeusBackend, Box<dyn Error>> {
    if let Some(dir) = env_var("AMADEUS_MOCK_DIR") {
        let mock = MockAmadeusClient::new(&dir)?;
        info!(
            dir = %dir,
            routes = mock.available_routes().len(),
            "serving flight offers from fixtures"
        );
        return Ok(AmadeusBackend::Mock(mock));
    }

    let client_id = env_var("AMADEUS_CLIENT_ID").unwrap_or_else(|| {
        warn!("AMADEUS_CLIENT_ID not set. Price lookups will fail.");
        String::new()
    });
    let client_secret = env_var("AMADEUS_CLIENT_SECRET").unwrap_or_else(|| {
        warn!("AMADEUS_CLIENT_SECRET not set. Price lookups will fail.");
        String::new()
    });

    let mut config = AmadeusConfig::new(client_id, client_secret);
    if let Some(base_url) = env_var("AMADEUS_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    info!(base_url = %config.base_url, "using Amadeus API");

    Ok(AmadeusBackend::Live(AmadeusClient::new(config)?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let backend = backend_from_env()?;
    let backend_kind = backend.kind();

    let source = CachedOfferSource::new(backend, &CacheConfig::default());
    let config = PlannerConfig::default().with_destinations(destinations_from_env()?);
    info!(
        destinations = config.destinations.len(),
        max_concurrent_legs = config.max_concurrent_legs,
        "planner configured"
    );

    let state = AppState::new(Planner::new(source, config));
    let app = create_router(state);

    let addr: SocketAddr = env_var("RENDEZVOUS_ADDR")
        .as_deref()
        .unwrap_or(DEFAULT_ADDR)
        .parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend = backend_kind, "group destination finder listening");
    info!("  GET  /health                    - Health check");
    info!("  GET  /api/destinations/defaults - Default candidate destinations");
    info!("  POST /api/destinations/search   - Rank common destinations");

    axum::serve(listener, app).await?;
    Ok(())
}
