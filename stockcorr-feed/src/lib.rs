#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unused_extern_crates,
    unused_import_braces
)]

//! # Stockcorr-Feed
//! Polling feed that fetches stock price series and re-runs the `stockcorr-core` analysis on
//! an interval.
//!
//! * [`PriceSource`](source::PriceSource) abstracts the stock API, with
//!   [`HttpPriceSource`](http::HttpPriceSource) as the REST implementation.
//! * [`DashboardState`](state::DashboardState) is the explicit selection both dashboards poll
//!   against, updated by client [`DashboardCommand`](state::DashboardCommand)s.
//! * [`DashboardPoller`](poller::DashboardPoller) publishes a
//!   [`DashboardEvent`](poller::DashboardEvent) on every tick.

/// Feed configuration loaded from the environment.
pub mod config;

/// All errors generated in `stockcorr-feed`.
pub mod error;

/// REST [`PriceSource`](source::PriceSource).
pub mod http;

/// Interval pollers & the snapshots they publish.
pub mod poller;

/// Lookback window of a price request.
pub mod range;

pub mod source;

/// Dashboard selection state & client commands.
pub mod state;

pub use config::FeedConfig;
pub use error::FeedError;
pub use http::HttpPriceSource;
pub use poller::{CorrelationSnapshot, DashboardEvent, DashboardPoller, DashboardView, StockSnapshot};
pub use range::TimeRange;
pub use source::{DEFAULT_TICKERS, PriceSource, default_tickers};
pub use state::{DashboardCommand, DashboardState};
