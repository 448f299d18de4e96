use crate::{
    align::align_series,
    extract::extract_price_arrays,
    matrix::CorrelationMatrix,
    series::SeriesSample,
    summary::{PriceSummary, summarise},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum number of series for a meaningful correlation analysis.
pub const MIN_CORRELATION_SERIES: usize = 2;

/// How a [`CorrelationAnalysis`] pairs up prices of two tickers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixPolicy {
    /// Correlate dense price arrays position-wise, see [`CorrelationMatrix::build`].
    #[default]
    Positional,
    /// Correlate each pair over common timestamps, see [`CorrelationMatrix::build_intersected`].
    Intersected,
}

impl MatrixPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixPolicy::Positional => "positional",
            MatrixPolicy::Intersected => "intersected",
        }
    }
}

impl std::fmt::Display for MatrixPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of one [`CorrelationAnalysis::analyse`] run.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CorrelationReport {
    pub matrix: CorrelationMatrix,
    /// Mean & standard deviation of each ticker's valid prices, in matrix order.
    pub summaries: Vec<PriceSummary>,
}

/// Runs align -> extract -> build -> summarise over a batch of raw series.
///
/// Stateless: every call allocates fresh output, so one instance can be shared freely across
/// threads & tasks.
#[derive(Debug, Copy, Clone, Default)]
pub struct CorrelationAnalysis {
    policy: MatrixPolicy,
}

impl CorrelationAnalysis {
    pub fn new(policy: MatrixPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatrixPolicy {
        self.policy
    }

    /// Analyse a batch of per-ticker series.
    ///
    /// Fewer than [`MIN_CORRELATION_SERIES`] series yields an empty matrix; summaries are still
    /// produced for whatever was supplied.
    pub fn analyse<Ts>(&self, batch: &[SeriesSample<Ts>]) -> CorrelationReport
    where
        Ts: Ord + Clone,
    {
        let aligned = align_series(batch);
        let arrays = extract_price_arrays(&aligned);
        let summaries = summarise(&arrays);

        if batch.len() < MIN_CORRELATION_SERIES {
            debug!(
                series = batch.len(),
                required = MIN_CORRELATION_SERIES,
                "skipping correlation matrix for undersized batch"
            );
            return CorrelationReport {
                matrix: CorrelationMatrix::empty(),
                summaries,
            };
        }

        let matrix = match self.policy {
            MatrixPolicy::Positional => CorrelationMatrix::build(&arrays),
            MatrixPolicy::Intersected => CorrelationMatrix::build_intersected(&aligned),
        };

        debug!(
            tickers = matrix.len(),
            timestamps = aligned.first().map(|series| series.len()).unwrap_or_default(),
            policy = %self.policy,
            "built correlation matrix"
        );

        CorrelationReport { matrix, summaries }
    }
}
