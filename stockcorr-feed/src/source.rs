use crate::{error::FeedError, range::TimeRange};
use async_trait::async_trait;
use stockcorr_core::{SeriesSample, Ticker};

/// Tickers offered by the stock API.
pub const DEFAULT_TICKERS: [&str; 7] = ["AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NFLX"];

/// [`DEFAULT_TICKERS`] as owned [`Ticker`]s.
pub fn default_tickers() -> Vec<Ticker> {
    DEFAULT_TICKERS.into_iter().map(Ticker::from).collect()
}

/// Provider of raw per-ticker price series.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the series of one ticker over the last `range`.
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<SeriesSample, FeedError>;

    /// Tickers this source can serve.
    async fn available_tickers(&self) -> Result<Vec<Ticker>, FeedError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tickers() {
        let tickers = default_tickers();
        assert_eq!(tickers.len(), 7);
        assert_eq!(tickers[0].as_str(), "AAPL");
        assert_eq!(tickers[6].as_str(), "NFLX");
    }
}
