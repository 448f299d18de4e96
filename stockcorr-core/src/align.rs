//! Time-series aligner.
//!
//! Tickers are sampled independently, so their timestamps rarely line up. Alignment puts every
//! series of a batch onto one shared, ascending timestamp axis (the union of all input
//! timestamps) and marks positions where a ticker did not report as gaps.

use crate::series::{AlignedSeries, PricePoint, SeriesSample};
use std::collections::{BTreeMap, BTreeSet};

/// Align a batch of [`SeriesSample`]s onto the sorted union of their timestamps.
///
/// * Every output series has the same length and timestamp sequence.
/// * Output order follows input order.
/// * Duplicate timestamps within one series: the last occurrence wins.
/// * An empty batch yields an empty output.
pub fn align_series<Ts>(batch: &[SeriesSample<Ts>]) -> Vec<AlignedSeries<Ts>>
where
    Ts: Ord + Clone,
{
    if batch.is_empty() {
        return Vec::new();
    }

    let timestamps = batch
        .iter()
        .flat_map(|series| series.points.iter().map(|point| &point.timestamp))
        .collect::<BTreeSet<_>>();

    batch
        .iter()
        .map(|series| {
            // Later inserts overwrite earlier ones
            let lookup = series
                .points
                .iter()
                .map(|point| (&point.timestamp, point.price))
                .collect::<BTreeMap<_, _>>();

            let points = timestamps
                .iter()
                .map(|timestamp| {
                    let price = lookup.get(timestamp).copied().flatten();
                    PricePoint::new((*timestamp).clone(), price)
                })
                .collect();

            AlignedSeries {
                ticker: series.ticker.clone(),
                points,
            }
        })
        .collect()
}
