//! Dashboard server: polls the stock API for the selected tickers, re-runs the correlation
//! analysis and broadcasts every snapshot as JSON to connected WebSocket clients.

mod config;
mod error;
mod server;

use crate::{
    config::ServerConfig,
    error::ServerError,
    server::{ServerContext, bind, serve},
};
use std::{process::ExitCode, sync::Arc};
use stockcorr_core::{CorrelationAnalysis, Ticker};
use stockcorr_feed::{
    DashboardCommand, DashboardPoller, DashboardState, DashboardView, HttpPriceSource,
    PriceSource,
};
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "stockcorr server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_env();

    info!(
        api_url = %config.feed.api_url,
        buffer_size = config.buffer_size,
        "Starting stockcorr dashboard server"
    );

    let source = Arc::new(HttpPriceSource::new(&config.feed)?);
    let available = source.available_tickers().await?;
    let state = initial_state(&config, &available)?;

    info!(
        selected = ?state.selected,
        focus = ?state.focus,
        time_range = %state.time_range,
        "initial dashboard state"
    );

    let (events_tx, _) = broadcast::channel(config.buffer_size);
    let (state_tx, state_rx) = watch::channel(state);

    let analysis = CorrelationAnalysis::new(config.feed.policy);
    info!(policy = %analysis.policy(), "correlation matrix policy");

    let poller = DashboardPoller::new(source, analysis, events_tx.clone());
    let correlation = poller.spawn(
        DashboardView::Correlation,
        config.feed.correlation_interval,
        state_rx.clone(),
    );
    let stock = poller.spawn(DashboardView::Stock, config.feed.stock_interval, state_rx);

    let listener = bind(config.addr).await?;
    info!("Clients can connect to ws://{}", config.addr);

    tokio::select! {
        _ = serve(listener, ServerContext::new(events_tx, state_tx, available, config.buffer_size)) => {
            warn!("WebSocket listener stopped");
        }
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("received shutdown signal"),
            Err(error) => warn!(%error, "failed to listen for shutdown signal"),
        },
    }

    correlation.abort();
    stock.abort();

    Ok(())
}

/// Default selection, overridden by configured `TICKERS` which must all be available.
fn initial_state(
    config: &ServerConfig,
    available: &[Ticker],
) -> Result<DashboardState, ServerError> {
    let mut state =
        DashboardState::initial(available).with_time_range(config.feed.time_range);

    if let Some(tickers) = config.feed.tickers.clone() {
        if let Some(first) = tickers.first().cloned() {
            state.apply(DashboardCommand::Focus { ticker: first }, available)?;
        }
        state.apply(DashboardCommand::Select { tickers }, available)?;
    }

    Ok(state)
}

/// Initialise logging, JSON formatted if `LOG_FORMAT=json`.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
