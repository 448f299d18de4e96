#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unused_extern_crates,
    unused_import_braces
)]

//! # Stockcorr-Core
//! Pure, synchronous building blocks for comparing independently sampled stock price series.
//!
//! The pipeline runs leaf to root:
//! * [`align`]: merge per-ticker series onto the sorted union of their timestamps, marking gaps.
//! * [`extract`]: drop the gaps, leaving one dense price array per ticker.
//! * [`matrix`]: build the full pairwise Pearson [`CorrelationMatrix`](matrix::CorrelationMatrix).
//! * [`summary`]: per-ticker mean & standard deviation for display next to the matrix.
//!
//! [`CorrelationAnalysis`](analysis::CorrelationAnalysis) wires the stages together.
//!
//! Every stage is a total function: degenerate input (empty batches, mismatched lengths,
//! constant series) yields a neutral value rather than an error.

/// Ties every stage together into one `batch -> report` call.
pub mod analysis;

/// Time-series aligner.
pub mod align;

/// Price-array extractor.
pub mod extract;

/// Pairwise correlation matrix builder.
pub mod matrix;

/// Core series models: [`Ticker`](series::Ticker), [`PricePoint`](series::PricePoint) & friends.
pub mod series;

/// Mean, standard deviation & Pearson correlation.
pub mod statistic;

/// Per-ticker summary statistics.
pub mod summary;

pub use analysis::{CorrelationAnalysis, CorrelationReport, MIN_CORRELATION_SERIES, MatrixPolicy};
pub use matrix::{CorrelationMatrix, CorrelationRow};
pub use series::{AlignedSeries, PricePoint, SeriesSample, Ticker};
pub use summary::PriceSummary;
