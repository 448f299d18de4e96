//! Pairwise Pearson correlation matrix.
//!
//! Two construction policies are available:
//! * [`CorrelationMatrix::build`] correlates the dense [`PriceArrays`] position-wise. Tickers
//!   whose arrays differ in length correlate to `0.0` through the [`pearson`] length-mismatch
//!   fallback, even if they share some timestamps.
//! * [`CorrelationMatrix::build_intersected`] correlates each pair only over the timestamps where
//!   both tickers reported a price.

use crate::{
    extract::PriceArrays,
    series::{AlignedSeries, Ticker},
    statistic::pearson,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a [`CorrelationMatrix`]: `ticker` against every ticker of the matrix.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CorrelationRow {
    pub ticker: Ticker,
    pub correlations: IndexMap<Ticker, f64>,
}

impl CorrelationRow {
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.correlations.get(ticker).copied()
    }
}

/// Square, symmetric table of pairwise correlation coefficients.
///
/// Rows & columns share one order, fixed by the order tickers were first supplied. A ticker's
/// diagonal entry is `1.0` when it has at least two distinct valid prices, else `0.0`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    rows: Vec<CorrelationRow>,
}

impl CorrelationMatrix {
    /// Construct an empty [`CorrelationMatrix`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the full matrix from dense price arrays, including self-correlation.
    ///
    /// O(T² · L) for T tickers of L samples.
    pub fn build(arrays: &PriceArrays) -> Self {
        let rows = arrays
            .iter()
            .map(|(ticker_a, prices_a)| CorrelationRow {
                ticker: ticker_a.clone(),
                correlations: arrays
                    .iter()
                    .map(|(ticker_b, prices_b)| (ticker_b.clone(), pearson(prices_a, prices_b)))
                    .collect(),
            })
            .collect();

        Self { rows }
    }

    /// Build the full matrix, correlating every pair over its common valid timestamps only.
    ///
    /// Pairs without at least two common timestamps where both tickers vary correlate to `0.0`.
    /// A duplicate ticker keeps its first position and its last series.
    pub fn build_intersected<Ts>(aligned: &[AlignedSeries<Ts>]) -> Self
    where
        Ts: Ord,
    {
        let mut valid = IndexMap::<&Ticker, BTreeMap<&Ts, f64>>::with_capacity(aligned.len());
        for series in aligned {
            let prices = series
                .points
                .iter()
                .filter_map(|point| point.price.map(|price| (&point.timestamp, price)))
                .collect();

            valid.insert(&series.ticker, prices);
        }

        let rows = valid
            .iter()
            .map(|(ticker_a, prices_a)| CorrelationRow {
                ticker: (*ticker_a).clone(),
                correlations: valid
                    .iter()
                    .map(|(ticker_b, prices_b)| {
                        let (x, y): (Vec<f64>, Vec<f64>) = prices_a
                            .iter()
                            .filter_map(|(timestamp, price_a)| {
                                prices_b.get(timestamp).map(|price_b| (*price_a, *price_b))
                            })
                            .unzip();

                        ((*ticker_b).clone(), pearson(&x, &y))
                    })
                    .collect(),
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[CorrelationRow] {
        &self.rows
    }

    /// Tickers in row (and column) order.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> + '_ {
        self.rows.iter().map(|row| &row.ticker)
    }

    /// Correlation of `row` against `column`, if both tickers are present.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|candidate| candidate.ticker.as_str() == row)
            .and_then(|row| row.get(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        align::align_series,
        extract::extract_price_arrays,
        series::{PricePoint, SeriesSample},
    };

    fn arrays(input: &[(&str, &[f64])]) -> PriceArrays {
        input
            .iter()
            .map(|(ticker, prices)| (Ticker::from(*ticker), prices.to_vec()))
            .collect()
    }

    fn series(ticker: &str, points: &[(i64, f64)]) -> SeriesSample<i64> {
        SeriesSample::new(
            ticker,
            points
                .iter()
                .map(|(timestamp, price)| PricePoint::priced(*timestamp, *price))
                .collect(),
        )
    }

    fn assert_symmetric(matrix: &CorrelationMatrix) {
        let tickers = matrix.tickers().cloned().collect::<Vec<_>>();
        for a in &tickers {
            for b in &tickers {
                assert_eq!(
                    matrix.get(a.as_str(), b.as_str()),
                    matrix.get(b.as_str(), a.as_str()),
                    "{a}/{b} not symmetric"
                );
            }
        }
    }

    #[test]
    fn test_build_row_and_key_sets_match_input() {
        let input = arrays(&[
            ("MSFT", &[1.0, 2.0, 3.0]),
            ("AAPL", &[3.0, 2.0, 1.0]),
            ("GOOGL", &[1.0, 3.0, 2.0]),
        ]);

        let matrix = CorrelationMatrix::build(&input);

        let expected = vec!["MSFT", "AAPL", "GOOGL"];
        assert_eq!(matrix.tickers().map(Ticker::as_str).collect::<Vec<_>>(), expected);
        for row in matrix.rows() {
            let keys = row.correlations.keys().map(Ticker::as_str).collect::<Vec<_>>();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn test_build_values() {
        struct TestCase {
            row: &'static str,
            column: &'static str,
            expected: Option<f64>,
        }

        let input = arrays(&[
            ("A", &[1.0, 2.0, 3.0]),
            ("B", &[3.0, 2.0, 1.0]),
            ("C", &[4.0, 4.0, 4.0]),
            ("D", &[10.0, 12.0]),
        ]);
        let matrix = CorrelationMatrix::build(&input);

        let tests = vec![
            TestCase {
                // TC0: diagonal of a varying series
                row: "A",
                column: "A",
                expected: Some(1.0),
            },
            TestCase {
                // TC1: perfect negative
                row: "A",
                column: "B",
                expected: Some(-1.0),
            },
            TestCase {
                // TC2: constant series has a zero diagonal
                row: "C",
                column: "C",
                expected: Some(0.0),
            },
            TestCase {
                // TC3: constant series against varying series
                row: "A",
                column: "C",
                expected: Some(0.0),
            },
            TestCase {
                // TC4: length mismatch
                row: "D",
                column: "A",
                expected: Some(0.0),
            },
            TestCase {
                // TC5: unknown ticker
                row: "A",
                column: "NFLX",
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = matrix.get(test.row, test.column);
            match (actual, test.expected) {
                (Some(actual), Some(expected)) => assert!(
                    (actual - expected).abs() < 1e-12,
                    "TC{index} failed: {actual} != {expected}"
                ),
                (actual, expected) => assert_eq!(actual, expected, "TC{index} failed"),
            }
        }

        assert_symmetric(&matrix);
    }

    #[test]
    fn test_build_single_sample_diagonal_is_zero() {
        let matrix = CorrelationMatrix::build(&arrays(&[("A", &[5.0]), ("B", &[1.0, 2.0])]));
        assert_eq!(matrix.get("A", "A"), Some(0.0));
        assert_eq!(matrix.get("B", "B"), Some(1.0));
    }

    #[test]
    fn test_build_disjoint_timestamps_falls_back_to_zero() {
        let batch = vec![
            series("A", &[(1, 10.0), (3, 12.0)]),
            series("B", &[(2, 5.0)]),
        ];

        let matrix = CorrelationMatrix::build(&extract_price_arrays(&align_series(&batch)));

        assert_eq!(matrix.get("A", "B"), Some(0.0));
        assert_eq!(matrix.get("B", "A"), Some(0.0));
        assert_eq!(matrix.get("A", "A"), Some(1.0));
        // Single valid price
        assert_eq!(matrix.get("B", "B"), Some(0.0));
    }

    #[test]
    fn test_build_positional_ignores_timestamps() {
        // Equal lengths over shifted timestamps still correlate position-wise
        let batch = vec![
            series("A", &[(1, 1.0), (2, 2.0), (3, 3.0)]),
            series("B", &[(2, 1.0), (3, 2.0), (4, 3.0)]),
        ];

        let matrix = CorrelationMatrix::build(&extract_price_arrays(&align_series(&batch)));
        assert_eq!(matrix.get("A", "B"), Some(1.0));
    }

    #[test]
    fn test_build_intersected() {
        struct TestCase {
            batch: Vec<SeriesSample<i64>>,
            expected_ab: f64,
        }

        let tests = vec![
            TestCase {
                // TC0: disjoint timestamps
                batch: vec![
                    series("A", &[(1, 10.0), (3, 12.0)]),
                    series("B", &[(2, 5.0)]),
                ],
                expected_ab: 0.0,
            },
            TestCase {
                // TC1: partial overlap, identical prices on the overlap
                batch: vec![
                    series("A", &[(1, 10.0), (2, 11.0), (3, 12.0), (4, 13.0)]),
                    series("B", &[(2, 11.0), (3, 12.0), (4, 13.0), (5, 20.0)]),
                ],
                expected_ab: 1.0,
            },
            TestCase {
                // TC2: full overlap, opposite moves
                batch: vec![
                    series("A", &[(1, 1.0), (2, 2.0), (3, 3.0)]),
                    series("B", &[(1, 3.0), (2, 2.0), (3, 1.0)]),
                ],
                expected_ab: -1.0,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let matrix = CorrelationMatrix::build_intersected(&align_series(&test.batch));
            let actual = matrix.get("A", "B").unwrap();
            assert!(
                (actual - test.expected_ab).abs() < 1e-12,
                "TC{index} failed: {actual} != {}",
                test.expected_ab
            );
            assert_symmetric(&matrix);
        }
    }

    #[test]
    fn test_build_intersected_diagonal() {
        let batch = vec![
            series("A", &[(1, 10.0), (2, 11.0)]),
            series("B", &[(3, 7.0)]),
        ];

        let matrix = CorrelationMatrix::build_intersected(&align_series(&batch));
        assert_eq!(matrix.get("A", "A"), Some(1.0));
        assert_eq!(matrix.get("B", "B"), Some(0.0));
    }

    #[test]
    fn test_empty_matrix_serialises_as_empty_array() {
        let json = serde_json::to_string(&CorrelationMatrix::empty()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_matrix_serialises_as_row_array() {
        let matrix = CorrelationMatrix::build(&arrays(&[("B", &[1.0, 2.0]), ("A", &[2.0, 1.0])]));

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "ticker": "B", "correlations": { "B": 1.0, "A": -1.0 } },
                { "ticker": "A", "correlations": { "B": -1.0, "A": 1.0 } },
            ])
        );
    }
}
