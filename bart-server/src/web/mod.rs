//! Web layer for the BART departure board.
//!
//! Provides the JSON endpoints for live departures and trip times, the
//! board API backed by the poller, and the HTML board page.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
