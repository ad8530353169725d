//! Web layer for the group destination finder.
//!
//! Provides the JSON search endpoint and a few supporting routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppPlanner, AppState};
