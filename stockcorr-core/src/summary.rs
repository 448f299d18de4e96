use crate::{
    extract::PriceArrays,
    series::{PricePoint, Ticker},
    statistic::{mean, stddev},
};
use serde::{Deserialize, Serialize};

/// Per-ticker price statistics displayed alongside a correlation matrix or price chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceSummary {
    pub ticker: Ticker,
    /// Arithmetic mean of the valid prices, `0.0` if there are none.
    pub mean: f64,
    /// Population standard deviation of the valid prices.
    pub stddev: f64,
    /// Number of valid (non-gap) prices.
    pub samples: usize,
}

impl PriceSummary {
    pub fn from_prices(ticker: Ticker, prices: &[f64]) -> Self {
        Self {
            ticker,
            mean: mean(prices),
            stddev: stddev(prices),
            samples: prices.len(),
        }
    }

    /// Summarise a raw point sequence, ignoring gaps.
    pub fn from_points<Ts>(ticker: Ticker, points: &[PricePoint<Ts>]) -> Self {
        let prices = points
            .iter()
            .filter_map(|point| point.price)
            .collect::<Vec<_>>();

        Self::from_prices(ticker, &prices)
    }
}

/// One [`PriceSummary`] per ticker, in [`PriceArrays`] order.
pub fn summarise(arrays: &PriceArrays) -> Vec<PriceSummary> {
    arrays
        .iter()
        .map(|(ticker, prices)| PriceSummary::from_prices(ticker.clone(), prices))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_ignores_gaps() {
        let points = vec![
            PricePoint::priced(1, 2.0),
            PricePoint::gap(2),
            PricePoint::priced(3, 4.0),
            PricePoint::priced(4, 6.0),
        ];

        let summary = PriceSummary::from_points(Ticker::from("AAPL"), &points);

        assert_eq!(summary.samples, 3);
        assert!((summary.mean - 4.0).abs() < 1e-12);
        assert!((summary.stddev - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_from_prices_empty() {
        let summary = PriceSummary::from_prices(Ticker::from("META"), &[]);
        assert_eq!(
            summary,
            PriceSummary {
                ticker: Ticker::from("META"),
                mean: 0.0,
                stddev: 0.0,
                samples: 0,
            }
        );
    }

    #[test]
    fn test_summarise_keeps_array_order() {
        let arrays = PriceArrays::from_iter([
            (Ticker::from("TSLA"), vec![1.0, 3.0]),
            (Ticker::from("AMZN"), vec![5.0]),
        ]);

        let summaries = summarise(&arrays);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].ticker.as_str(), "TSLA");
        assert_eq!(summaries[0].mean, 2.0);
        assert_eq!(summaries[0].stddev, 1.0);
        assert_eq!(summaries[1].ticker.as_str(), "AMZN");
        assert_eq!(summaries[1].stddev, 0.0);
    }
}
