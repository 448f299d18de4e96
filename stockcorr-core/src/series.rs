use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;

/// Unique identifier for a tradable instrument (eg/ "AAPL").
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Ticker(SmolStr);

impl Ticker {
    pub fn new<S>(ticker: S) -> Self
    where
        S: AsRef<str>,
    {
        Self(SmolStr::new(ticker))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Ticker {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Ticker {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Single price observation.
///
/// Ordering between points is defined by `timestamp`, never by arrival order. A `None` price
/// marks a gap: the ticker did not report at this timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricePoint<Ts = DateTime<Utc>> {
    pub timestamp: Ts,
    pub price: Option<f64>,
}

impl<Ts> PricePoint<Ts> {
    pub fn new(timestamp: Ts, price: Option<f64>) -> Self {
        Self { timestamp, price }
    }

    /// Construct a [`PricePoint`] that carries a reported price.
    pub fn priced(timestamp: Ts, price: f64) -> Self {
        Self::new(timestamp, Some(price))
    }

    /// Construct a [`PricePoint`] gap.
    pub fn gap(timestamp: Ts) -> Self {
        Self::new(timestamp, None)
    }

    pub fn is_gap(&self) -> bool {
        self.price.is_none()
    }
}

/// Raw series for one ticker, as delivered by a price source.
///
/// Points need not be sorted. If a timestamp appears more than once, the last occurrence wins
/// during alignment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeriesSample<Ts = DateTime<Utc>> {
    pub ticker: Ticker,
    pub points: Vec<PricePoint<Ts>>,
}

impl<Ts> SeriesSample<Ts> {
    pub fn new<T>(ticker: T, points: Vec<PricePoint<Ts>>) -> Self
    where
        T: Into<Ticker>,
    {
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// Reported (non-gap) prices in their original order.
    pub fn valid_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|point| point.price)
    }
}

/// Series re-expressed over a timestamp axis shared by every series of the same batch.
///
/// See [`align_series`](crate::align::align_series).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlignedSeries<Ts = DateTime<Utc>> {
    pub ticker: Ticker,
    pub points: Vec<PricePoint<Ts>>,
}

impl<Ts> AlignedSeries<Ts> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shared timestamp axis of this series' batch.
    pub fn timestamps(&self) -> impl Iterator<Item = &Ts> + '_ {
        self.points.iter().map(|point| &point.timestamp)
    }

    /// Reported prices with gaps removed, order preserved.
    pub fn valid_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|point| point.price)
    }

    /// Number of gap positions.
    pub fn gaps(&self) -> usize {
        self.points.iter().filter(|point| point.is_gap()).count()
    }
}
