//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::planner::{SearchError, SearchRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/destinations/defaults", get(default_destinations))
        .route("/api/destinations/search", post(search_destinations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The candidate destinations searched when a request names none.
async fn default_destinations(State(state): State<AppState>) -> Json<DefaultDestinationsResponse> {
    Json(DefaultDestinationsResponse {
        destinations: state.planner.config().destinations.clone(),
    })
}

/// Find and rank destinations every origin can fly to.
async fn search_destinations(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: DestinationSearchRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(
            body = %String::from_utf8_lossy(&body),
            error = %e,
            "rejected destination search body"
        );
        AppError::BadRequest {
            message: format!("Invalid request: {e}"),
        }
    })?;

    let request = SearchRequest::parse(
        &req.origins,
        req.destinations.as_deref(),
        req.date.as_deref(),
        req.non_stop,
        req.criterion.as_deref(),
    )?;

    info!(
        origins = request.origins.len(),
        date = %request.date,
        criterion = %request.criterion,
        "destination search"
    );

    let result = state.planner.search(&request).await?;

    let response = DestinationSearchResponse::new(request.origins, request.date, result);
    Ok(Json(response).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(error = %message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                // Detail stays in the logs.
                error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
