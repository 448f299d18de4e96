use crate::{error::FeedError, range::TimeRange, source::PriceSource, state::DashboardState};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use stockcorr_core::{
    CorrelationAnalysis, CorrelationReport, PricePoint, PriceSummary, Ticker, align::align_series,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

/// Dashboard a poll tick is computed for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    /// Correlation heatmap over every selected ticker.
    Correlation,
    /// Price history of the focus ticker.
    Stock,
}

impl DashboardView {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardView::Correlation => "correlation",
            DashboardView::Stock => "stock",
        }
    }
}

impl std::fmt::Display for DashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one correlation poll tick.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CorrelationSnapshot {
    pub time: DateTime<Utc>,
    pub time_range: TimeRange,
    pub report: CorrelationReport,
}

/// Result of one single stock poll tick.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StockSnapshot {
    pub time: DateTime<Utc>,
    pub time_range: TimeRange,
    pub ticker: Ticker,
    /// Sorted, de-duplicated points including gaps.
    pub points: Vec<PricePoint>,
    pub summary: PriceSummary,
}

/// Event published by a [`DashboardPoller`] after every tick.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    Correlation(CorrelationSnapshot),
    Stock(StockSnapshot),
    Error {
        view: DashboardView,
        message: String,
        transient: bool,
    },
}

impl DashboardEvent {
    pub fn error(view: DashboardView, error: &FeedError) -> Self {
        Self::Error {
            view,
            message: error.to_string(),
            transient: error.is_transient(),
        }
    }

    pub fn view(&self) -> DashboardView {
        match self {
            DashboardEvent::Correlation(_) => DashboardView::Correlation,
            DashboardEvent::Stock(_) => DashboardView::Stock,
            DashboardEvent::Error { view, .. } => *view,
        }
    }
}

/// Fetch every selected ticker concurrently and run the correlation analysis.
///
/// Fails as a whole if any single fetch fails.
pub async fn poll_correlation<S>(
    source: &S,
    analysis: &CorrelationAnalysis,
    state: &DashboardState,
) -> Result<CorrelationSnapshot, FeedError>
where
    S: PriceSource + ?Sized,
{
    let tickers = state.validate_correlation()?;

    let batch = try_join_all(
        tickers
            .iter()
            .map(|ticker| source.fetch_series(ticker, state.time_range)),
    )
    .await?;

    let report = analysis.analyse(&batch);

    Ok(CorrelationSnapshot {
        time: Utc::now(),
        time_range: state.time_range,
        report,
    })
}

/// Fetch the focus ticker and summarise its valid prices.
pub async fn poll_stock<S>(source: &S, state: &DashboardState) -> Result<StockSnapshot, FeedError>
where
    S: PriceSource + ?Sized,
{
    let ticker = state.focus_ticker()?;
    let series = source.fetch_series(ticker, state.time_range).await?;

    let points = align_series(std::slice::from_ref(&series))
        .into_iter()
        .next()
        .map(|aligned| aligned.points)
        .unwrap_or_default();

    let summary = PriceSummary::from_points(ticker.clone(), &points);

    Ok(StockSnapshot {
        time: Utc::now(),
        time_range: state.time_range,
        ticker: ticker.clone(),
        points,
        summary,
    })
}

/// Interval poller re-running the analysis for one [`DashboardView`].
#[derive(Debug)]
pub struct DashboardPoller<S> {
    source: Arc<S>,
    analysis: CorrelationAnalysis,
    events_tx: broadcast::Sender<DashboardEvent>,
}

impl<S> Clone for DashboardPoller<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            analysis: self.analysis,
            events_tx: self.events_tx.clone(),
        }
    }
}

impl<S> DashboardPoller<S>
where
    S: PriceSource + 'static,
{
    pub fn new(
        source: Arc<S>,
        analysis: CorrelationAnalysis,
        events_tx: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        Self {
            source,
            analysis,
            events_tx,
        }
    }

    /// Run a single tick, mapping failures to [`DashboardEvent::Error`].
    pub async fn poll(&self, view: DashboardView, state: &DashboardState) -> DashboardEvent {
        let result = match view {
            DashboardView::Correlation => {
                poll_correlation(self.source.as_ref(), &self.analysis, state)
                    .await
                    .map(DashboardEvent::Correlation)
            }
            DashboardView::Stock => poll_stock(self.source.as_ref(), state)
                .await
                .map(DashboardEvent::Stock),
        };

        result.unwrap_or_else(|error| {
            if error.is_transient() {
                warn!(%view, %error, "dashboard poll failed, retrying next tick");
            } else {
                debug!(%view, %error, "dashboard poll rejected by current selection");
            }
            DashboardEvent::error(view, &error)
        })
    }

    /// Spawn a task that polls `view` every `period` and publishes each [`DashboardEvent`].
    ///
    /// A [`DashboardState`] change triggers an immediate poll and restarts the period. The task
    /// stops once every [`watch::Sender`] of `state_rx` is dropped.
    pub fn spawn(
        &self,
        view: DashboardView,
        period: Duration,
        mut state_rx: watch::Receiver<DashboardState>,
    ) -> JoinHandle<()> {
        let poller = self.clone();

        tokio::spawn(async move {
            info!(%view, ?period, "starting dashboard poller");

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        interval.reset();
                    }
                }

                let state = state_rx.borrow_and_update().clone();
                let event = poller.poll(view, &state).await;

                if poller.events_tx.send(event).is_err() {
                    debug!(%view, "no dashboard subscribers, dropping event");
                }
            }

            info!(%view, "dashboard state closed, stopping poller");
        })
    }
}
