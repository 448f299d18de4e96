//! Statistics primitives over plain `f64` slices.
//!
//! All functions are total: empty, single-sample or constant input returns `0.0`.

/// Arithmetic mean. Returns `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N, not N-1).
/// Returns `0.0` for fewer than two values.
pub fn stddev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let avg = mean(values);
    let variance = values
        .iter()
        .map(|value| {
            let diff = value - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}

/// Pearson correlation coefficient, from -1.0 to +1.0.
///
/// Σ(xi−x̄)(yi−ȳ) / sqrt(Σ(xi−x̄)² · Σ(yi−ȳ)²)
///
/// Deviations are divided by the largest absolute deviation of their input before summing, so
/// the sums stay within `[1, N]` whatever the price scale. The coefficient is unchanged by the
/// rescaling and self-correlation stays exactly `1.0`.
///
/// Returns `0.0` when the inputs differ in length, are empty, or either input has zero variance.
/// The result is not clamped.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let scale_x = max_abs_deviation(x, mean_x);
    let scale_y = max_abs_deviation(y, mean_y);
    if scale_x == 0.0 || scale_y == 0.0 {
        return 0.0;
    }

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let diff_x = (xi - mean_x) / scale_x;
        let diff_y = (yi - mean_y) / scale_y;
        cov += diff_x * diff_y;
        var_x += diff_x * diff_x;
        var_y += diff_y * diff_y;
    }

    cov / (var_x * var_y).sqrt()
}

fn max_abs_deviation(values: &[f64], avg: f64) -> f64 {
    values
        .iter()
        .map(|value| (value - avg).abs())
        .fold(0.0, f64::max)
}
