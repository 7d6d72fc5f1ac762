//! HTTP route handlers.

use std::sync::Arc;
use std::time::Duration;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, put},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::bart::{BartError, FeedSource};
use crate::board::{DurationUnavailable, extract_departures, resolve_duration};
use crate::domain::catalog::stations;
use crate::domain::{Direction, StationCode};
use crate::poll::{BoardSnapshot, PollerHandle, Selection};

use super::dto::*;
use super::state::AppState;
use super::templates::BoardTemplate;

/// How long the page waits for a new selection's first board.
const BOARD_WAIT: Duration = Duration::from_secs(5);

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(board_page))
        .route("/health", get(health))
        .route("/departures", get(departures))
        .route("/trip-time", get(trip_time))
        .route("/api/board", get(board_json))
        .route("/api/selection", put(change_selection))
        .route("/api/stations", get(list_stations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// A query value, with blank treated as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_station(param: &str, raw: &str) -> Result<StationCode, AppError> {
    StationCode::parse_normalized(raw).map_err(|e| AppError::BadRequest {
        message: format!("invalid {param} {raw:?}: {e}"),
    })
}

fn parse_direction(raw: &str) -> Result<Direction, AppError> {
    Direction::parse(raw).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Live departures for a station and direction.
async fn departures(
    State(state): State<AppState>,
    Query(req): Query<DeparturesRequest>,
) -> Result<Json<DeparturesResponse>, AppError> {
    let station = match present(&req.station) {
        Some(raw) => parse_station("station", raw)?,
        None => state.defaults.station,
    };
    let direction = match present(&req.dir) {
        Some(raw) => parse_direction(raw)?,
        None => state.defaults.direction,
    };

    let board = state.feed()?.departures(station, direction).await?;

    let items = extract_departures(&board)
        .iter()
        .map(DepartureItem::from_estimate)
        .collect();

    Ok(Json(DeparturesResponse {
        station: board.station_name.unwrap_or_else(|| station.to_string()),
        dir: direction,
        items,
        timestamp: board.generated_at,
    }))
}

/// Fastest scheduled trip time between two stations.
async fn trip_time(
    State(state): State<AppState>,
    Query(req): Query<TripTimeRequest>,
) -> Result<Json<TripTimeResponse>, AppError> {
    let (Some(orig), Some(dest)) = (present(&req.orig), present(&req.dest)) else {
        return Err(AppError::BadRequest {
            message: "orig and dest are required".to_string(),
        });
    };
    let origin = parse_station("orig", orig)?;
    let destination = parse_station("dest", dest)?;
    if origin == destination {
        return Err(AppError::BadRequest {
            message: format!("orig and dest are both {origin}"),
        });
    }

    let candidates = state.feed()?.trips(origin, destination).await?;
    let duration = resolve_duration(origin, destination, &candidates)?;

    Ok(Json(TripTimeResponse {
        duration_min: duration.minutes(),
    }))
}

/// Build a selection from request fields, keeping `current` for any
/// field left out.
fn selection_from(req: &SelectionRequest, current: Selection) -> Result<Selection, AppError> {
    let station = match present(&req.station) {
        Some(raw) => parse_station("station", raw)?,
        None => current.station,
    };
    let direction = match present(&req.dir) {
        Some(raw) => parse_direction(raw)?,
        None => current.direction,
    };
    let destination = match present(&req.dest) {
        Some(raw) => parse_station("dest", raw)?,
        None => current.destination,
    };

    Selection::new(station, direction, destination).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// The latest published board.
async fn board_json(State(state): State<AppState>) -> Result<Json<BoardResponse>, AppError> {
    let snapshot = state.poller()?.snapshot();
    Ok(Json(BoardResponse::from_snapshot(&snapshot)))
}

/// Change what the board shows. The refresh happens in the background.
async fn change_selection(
    State(state): State<AppState>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let poller = state.poller()?;
    let selection = selection_from(&req, poller.selection())?;
    let changed = poller.select(selection);

    Ok((
        StatusCode::ACCEPTED,
        Json(SelectionResponse { selection, changed }),
    ))
}

/// Station catalog.
async fn list_stations() -> Json<StationsResponse> {
    Json(StationsResponse {
        stations: stations().map(StationResult::from).collect(),
    })
}

/// HTML departure board. Query parameters change the selection.
async fn board_page(
    State(state): State<AppState>,
    Query(req): Query<SelectionRequest>,
) -> Result<Html<String>, AppError> {
    let poller = state.poller()?;

    let snapshot = if req.is_empty() {
        poller.snapshot()
    } else {
        let selection = selection_from(&req, poller.selection())?;
        poller.select(selection);
        first_board(poller, selection).await
    };

    let html = BoardTemplate::from_snapshot(&snapshot, state.refresh_secs)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

    Ok(Html(html))
}

/// Wait briefly for a settled board for `selection`, falling back to
/// whatever is published.
async fn first_board(poller: &PollerHandle, selection: Selection) -> Arc<BoardSnapshot> {
    let mut rx = poller.subscribe();
    let waited = tokio::time::timeout(
        BOARD_WAIT,
        rx.wait_for(|s| s.selection == selection && s.cycles > 0),
    )
    .await;

    match waited {
        Ok(Ok(snapshot)) => Arc::clone(&snapshot),
        _ => poller.snapshot(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Invalid or missing request input
    BadRequest { message: String },
    /// The server has no usable upstream configuration
    Config { message: String },
    /// The upstream feed failed or returned nothing usable
    Upstream { message: String },
    Internal { message: String },
}

impl From<BartError> for AppError {
    fn from(e: BartError) -> Self {
        match e {
            BartError::NotConfigured(message) => AppError::Config { message },
            e => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<DurationUnavailable> for AppError {
    fn from(e: DurationUnavailable) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Config { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
