//! HTTP [`PriceSource`] for the stock exchange REST API.
//!
//! `GET {api_url}/stocks/{ticker}?minutes={m}` answers either with a series envelope
//! `{ "ticker": "AAPL", "data": [{ "timestamp": "...", "price": 1.0 }] }` or with the bare
//! point array.

use crate::{
    config::FeedConfig,
    error::FeedError,
    range::TimeRange,
    source::{PriceSource, default_tickers},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use stockcorr_core::{PricePoint, SeriesSample, Ticker};
use tracing::{debug, warn};
use url::Url;

/// Stock API response body
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StockResponse {
    Series {
        #[serde(default)]
        ticker: Option<String>,
        #[serde(alias = "points")]
        data: Vec<StockPricePoint>,
    },
    Points(Vec<StockPricePoint>),
}

#[derive(Debug, Deserialize)]
struct StockPricePoint {
    #[serde(alias = "lastUpdatedAt")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    price: Option<f64>,
}

impl StockResponse {
    fn into_series(self, requested: &Ticker) -> SeriesSample {
        let (ticker, data) = match self {
            StockResponse::Series { ticker, data } => (ticker, data),
            StockResponse::Points(data) => (None, data),
        };

        if let Some(received) = ticker.filter(|received| received != requested.as_str()) {
            warn!(
                requested = %requested,
                %received,
                "stock API answered for a different ticker, keeping requested"
            );
        }

        let points = data
            .into_iter()
            .map(|point| PricePoint::new(point.timestamp, point.price))
            .collect();

        SeriesSample {
            ticker: requested.clone(),
            points,
        }
    }
}

/// [`PriceSource`] backed by the stock exchange REST API.
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: reqwest::Client,
    api_url: Url,
    tickers: Vec<Ticker>,
}

impl HttpPriceSource {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let api_url = Url::parse(&config.api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(FeedError::InvalidUrl(config.api_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            api_url,
            tickers: default_tickers(),
        })
    }

    /// `{api_url}/stocks/{ticker}`
    pub fn series_url(&self, ticker: &Ticker) -> Result<Url, FeedError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| FeedError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .push("stocks")
            .push(ticker.as_str());

        Ok(url)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<SeriesSample, FeedError> {
        let url = self.series_url(ticker)?;

        let response = self
            .client
            .get(url)
            .query(&[("minutes", range.minutes())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                ticker: ticker.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let series = serde_json::from_slice::<StockResponse>(&body)
            .map_err(|error| FeedError::Decode {
                ticker: ticker.clone(),
                message: error.to_string(),
            })?
            .into_series(ticker);

        debug!(
            %ticker,
            %range,
            points = series.points.len(),
            "fetched stock series"
        );

        Ok(series)
    }

    async fn available_tickers(&self) -> Result<Vec<Ticker>, FeedError> {
        Ok(self.tickers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str) -> SeriesSample {
        serde_json::from_str::<StockResponse>(input)
            .unwrap()
            .into_series(&Ticker::from("AAPL"))
    }

    #[test]
    fn test_de_stock_response_envelope() {
        let series = decode(
            r#"{
                "ticker": "AAPL",
                "data": [
                    { "timestamp": "2025-05-06T10:00:00Z", "price": 201.5 },
                    { "timestamp": "2025-05-06T10:01:00.250Z", "price": null },
                    { "timestamp": "2025-05-06T10:02:00+00:00" }
                ]
            }"#,
        );

        assert_eq!(series.ticker.as_str(), "AAPL");
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].price, Some(201.5));
        assert!(series.points[1].is_gap());
        assert!(series.points[2].is_gap());
    }

    #[test]
    fn test_de_stock_response_bare_points() {
        let series = decode(
            r#"[
                { "price": 10.0, "lastUpdatedAt": "2025-05-06T10:00:00Z" },
                { "price": 11.0, "lastUpdatedAt": "2025-05-06T10:00:30Z" }
            ]"#,
        );

        assert_eq!(series.ticker.as_str(), "AAPL");
        assert_eq!(series.valid_prices().collect::<Vec<_>>(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_de_stock_response_mismatched_ticker_keeps_requested() {
        let series = decode(r#"{ "ticker": "MSFT", "data": [] }"#);
        assert_eq!(series.ticker.as_str(), "AAPL");
    }

    #[test]
    fn test_de_stock_response_invalid() {
        assert!(serde_json::from_str::<StockResponse>(r#"{ "price": 1.0 }"#).is_err());
    }

    #[test]
    fn test_series_url() {
        struct TestCase {
            api_url: &'static str,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: bare host
                api_url: "http://127.0.0.1:3000",
                expected: "http://127.0.0.1:3000/stocks/AAPL",
            },
            TestCase {
                // TC1: path prefix w/o trailing slash
                api_url: "https://api.example.com/v1",
                expected: "https://api.example.com/v1/stocks/AAPL",
            },
            TestCase {
                // TC2: path prefix w/ trailing slash
                api_url: "https://api.example.com/v1/",
                expected: "https://api.example.com/v1/stocks/AAPL",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let source = HttpPriceSource::new(&FeedConfig::new(test.api_url)).unwrap();
            let actual = source.series_url(&Ticker::from("AAPL")).unwrap();
            assert_eq!(actual.as_str(), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_http_price_source_rejects_invalid_url() {
        struct TestCase {
            api_url: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: not a url
                api_url: "stocks",
            },
            TestCase {
                // TC1: cannot-be-a-base url
                api_url: "mailto:ops@example.com",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = HttpPriceSource::new(&FeedConfig::new(test.api_url));
            assert!(
                matches!(actual, Err(FeedError::InvalidUrl(_))),
                "TC{} failed",
                index
            );
        }
    }

    #[tokio::test]
    async fn test_available_tickers_defaults() {
        let source = HttpPriceSource::new(&FeedConfig::default()).unwrap();
        let tickers = source.available_tickers().await.unwrap();
        assert_eq!(tickers, default_tickers());
    }
}
