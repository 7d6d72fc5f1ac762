use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bart_server::config::AppConfig;
use bart_server::poll::spawn_poller;
use bart_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bart_server=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // A missing key is reported per request rather than stopping the server
    let state = match config.feed() {
        Ok(feed) => {
            let feed = Arc::new(feed);
            let poller = spawn_poller(feed.clone(), config.default_selection, config.poll_config());
            AppState::new(feed, poller, config.refresh_interval.as_secs())
        }
        Err(e) => {
            warn!("{e}; feed endpoints will answer 500");
            AppState::unconfigured(e.to_string(), config.default_selection)
        }
    };

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    let addr = config.bind_addr;
    info!("BART departure board listening on http://{addr}");
    info!("  GET  /                - Departure board");
    info!("  GET  /health          - Health check");
    info!("  GET  /departures      - Live departures (?station=&dir=)");
    info!("  GET  /trip-time       - Fastest trip (?orig=&dest=)");
    info!("  GET  /api/board       - Current board as JSON");
    info!("  PUT  /api/selection   - Change the board's selection");
    info!("  GET  /api/stations    - Station list");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
