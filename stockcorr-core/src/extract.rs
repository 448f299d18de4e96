use crate::series::{AlignedSeries, Ticker};
use indexmap::IndexMap;

/// Ordered `Ticker -> dense prices` mapping.
///
/// Iteration order is the order tickers were first inserted, which fixes the row & column order
/// of any [`CorrelationMatrix`](crate::matrix::CorrelationMatrix) built from it.
pub type PriceArrays = IndexMap<Ticker, Vec<f64>>;

/// Convert aligned series into dense per-ticker price arrays by dropping gap positions.
///
/// Relative order within a ticker is preserved. Different tickers may end up with different
/// lengths, each covering its own subset of the shared timestamp axis.
///
/// A duplicate ticker overwrites the earlier prices but keeps the earlier position.
pub fn extract_price_arrays<Ts>(aligned: &[AlignedSeries<Ts>]) -> PriceArrays {
    let mut arrays = PriceArrays::with_capacity(aligned.len());

    for series in aligned {
        arrays.insert(series.ticker.clone(), series.valid_prices().collect());
    }

    arrays
}
