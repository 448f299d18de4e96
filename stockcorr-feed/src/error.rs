use serde::{Deserialize, Serialize};
use stockcorr_core::Ticker;
use thiserror::Error;

/// All errors generated in `stockcorr-feed`.
///
/// Variants carry rendered messages rather than source errors so they can be cloned into
/// broadcast events.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Error)]
pub enum FeedError {
    #[error("stock API request failed: {0}")]
    Http(String),

    #[error("stock API returned HTTP {status} for {ticker}")]
    Status { ticker: Ticker, status: u16 },

    #[error("failed to decode stock API response for {ticker}: {message}")]
    Decode { ticker: Ticker, message: String },

    #[error("invalid stock API url: {0}")]
    InvalidUrl(String),

    #[error("unsupported time range of {0} minutes, expected one of 5, 15, 30 or 60")]
    UnsupportedTimeRange(u32),

    #[error("select at least {required} tickers for correlation analysis, {selected} selected")]
    TooFewTickers { selected: usize, required: usize },

    #[error("no ticker selected for the stock view")]
    NoFocusTicker,

    #[error("unknown ticker: {0}")]
    UnknownTicker(Ticker),
}

impl FeedError {
    /// Determine if an error is expected to clear by itself on a later poll tick.
    ///
    /// Selection errors only clear once the [`DashboardState`](crate::state::DashboardState)
    /// changes.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Http(_) | FeedError::Status { .. } | FeedError::Decode { .. } => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}

impl From<url::ParseError> for FeedError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUrl(value.to_string())
    }
}
