use crate::{error::FeedError, range::TimeRange};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use stockcorr_core::{MIN_CORRELATION_SERIES, Ticker};

/// Number of tickers selected for the correlation view when none are configured.
pub const DEFAULT_SELECTION: usize = 5;

/// Selection driving both dashboards.
///
/// Owned by the caller and handed to the pollers through a `tokio::sync::watch` channel, so
/// every poll tick reads one consistent state.
#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize, Serialize)]
pub struct DashboardState {
    /// Tickers of the correlation view, in display order.
    pub selected: Vec<Ticker>,
    /// Ticker of the single stock view.
    pub focus: Option<Ticker>,
    pub time_range: TimeRange,
}

impl DashboardState {
    /// Select the first [`DEFAULT_SELECTION`] available tickers and focus the first one.
    pub fn initial(available: &[Ticker]) -> Self {
        Self {
            selected: available.iter().take(DEFAULT_SELECTION).cloned().collect(),
            focus: available.first().cloned(),
            time_range: TimeRange::default(),
        }
    }

    pub fn with_selected(mut self, selected: Vec<Ticker>) -> Self {
        self.selected = selected.into_iter().unique().collect();
        self
    }

    pub fn with_focus(mut self, focus: Ticker) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Tickers to correlate, or [`FeedError::TooFewTickers`] if fewer than
    /// [`MIN_CORRELATION_SERIES`] are selected.
    pub fn validate_correlation(&self) -> Result<&[Ticker], FeedError> {
        if self.selected.len() < MIN_CORRELATION_SERIES {
            return Err(FeedError::TooFewTickers {
                selected: self.selected.len(),
                required: MIN_CORRELATION_SERIES,
            });
        }

        Ok(&self.selected)
    }

    pub fn focus_ticker(&self) -> Result<&Ticker, FeedError> {
        self.focus.as_ref().ok_or(FeedError::NoFocusTicker)
    }

    /// Apply a client [`DashboardCommand`], validating tickers against `available`.
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, command: DashboardCommand, available: &[Ticker]) -> Result<(), FeedError> {
        match command {
            DashboardCommand::Select { tickers } => {
                let tickers = tickers
                    .iter()
                    .map(|ticker| known_ticker(ticker, available))
                    .collect::<Result<Vec<_>, _>>()?;

                self.selected = tickers.into_iter().unique().collect();
            }
            DashboardCommand::Focus { ticker } => {
                self.focus = Some(known_ticker(&ticker, available)?);
            }
            DashboardCommand::TimeRange { minutes } => {
                self.time_range = TimeRange::try_from(minutes)?;
            }
        }

        Ok(())
    }
}

fn known_ticker(ticker: &Ticker, available: &[Ticker]) -> Result<Ticker, FeedError> {
    let normalised = Ticker::new(ticker.as_str().trim().to_uppercase());
    if available.contains(&normalised) {
        Ok(normalised)
    } else {
        Err(FeedError::UnknownTicker(ticker.clone()))
    }
}

/// Command sent by a dashboard client to change the [`DashboardState`].
///
/// eg/ `{ "type": "select", "tickers": ["AAPL", "MSFT"] }`
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardCommand {
    Select { tickers: Vec<Ticker> },
    Focus { ticker: Ticker },
    TimeRange { minutes: u32 },
}
