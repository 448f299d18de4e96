use crate::range::TimeRange;
use std::time::Duration;
use stockcorr_core::{MatrixPolicy, Ticker};
use tracing::warn;

/// Stock feed configuration.
///
/// Every field can be overridden from the environment, see [`FeedConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Stock API base URL (`STOCK_API_URL`)
    pub api_url: String,
    /// Per-request HTTP timeout (`HTTP_TIMEOUT_SECS`)
    pub http_timeout: Duration,
    /// Correlation view poll period (`CORRELATION_POLL_SECS`)
    pub correlation_interval: Duration,
    /// Single stock view poll period (`STOCK_POLL_SECS`)
    pub stock_interval: Duration,
    /// Initially selected tickers (`TICKERS`), `None` selects the source's defaults
    pub tickers: Option<Vec<Ticker>>,
    /// Initial lookback window (`TIME_RANGE_MINUTES`)
    pub time_range: TimeRange,
    /// Correlation matrix policy (`MATRIX_POLICY`: positional | intersected)
    pub policy: MatrixPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000".to_string(),
            http_timeout: Duration::from_secs(10),
            correlation_interval: Duration::from_secs(30),
            stock_interval: Duration::from_secs(10),
            tickers: None,
            time_range: TimeRange::default(),
            policy: MatrixPolicy::default(),
        }
    }
}

impl FeedConfig {
    /// Create a new configuration with custom stock API URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Build a configuration from environment variables, falling back to defaults for any
    /// variable that is missing or malformed.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary `key -> value` lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let time_range = match lookup("TIME_RANGE_MINUTES").map(|value| value.trim().parse::<u32>()) {
            Some(Ok(minutes)) => TimeRange::try_from(minutes).unwrap_or_else(|error| {
                warn!(%error, "ignoring TIME_RANGE_MINUTES");
                defaults.time_range
            }),
            Some(Err(error)) => {
                warn!(%error, "ignoring malformed TIME_RANGE_MINUTES");
                defaults.time_range
            }
            None => defaults.time_range,
        };

        let policy = match lookup("MATRIX_POLICY").as_deref().map(str::trim) {
            Some("positional") => MatrixPolicy::Positional,
            Some("intersected") => MatrixPolicy::Intersected,
            Some(other) => {
                warn!(policy = other, "ignoring unknown MATRIX_POLICY");
                defaults.policy
            }
            None => defaults.policy,
        };

        let tickers = lookup("TICKERS").and_then(|value| {
            let tickers = parse_tickers(&value);
            if tickers.is_empty() {
                warn!(%value, "ignoring TICKERS without any ticker");
                None
            } else {
                Some(tickers)
            }
        });

        Self {
            api_url: lookup("STOCK_API_URL").unwrap_or(defaults.api_url),
            http_timeout: secs("HTTP_TIMEOUT_SECS", defaults.http_timeout),
            correlation_interval: secs("CORRELATION_POLL_SECS", defaults.correlation_interval),
            stock_interval: secs("STOCK_POLL_SECS", defaults.stock_interval),
            tickers,
            time_range,
            policy,
        }
    }

    /// Set HTTP timeout
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set correlation view poll period
    pub fn with_correlation_interval(mut self, interval: Duration) -> Self {
        self.correlation_interval = interval;
        self
    }

    /// Set single stock view poll period
    pub fn with_stock_interval(mut self, interval: Duration) -> Self {
        self.stock_interval = interval;
        self
    }

    /// Set initially selected tickers
    pub fn with_tickers(mut self, tickers: Vec<Ticker>) -> Self {
        self.tickers = Some(tickers);
        self
    }

    /// Set initial lookback window
    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Set correlation matrix policy
    pub fn with_policy(mut self, policy: MatrixPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Parse a comma separated ticker list, eg/ "aapl, MSFT,,nflx" -> [AAPL, MSFT, NFLX]
pub fn parse_tickers(value: &str) -> Vec<Ticker> {
    value
        .split(',')
        .map(|ticker| ticker.trim().to_uppercase())
        .filter(|ticker| !ticker.is_empty())
        .map(Ticker::from)
        .collect()
}
