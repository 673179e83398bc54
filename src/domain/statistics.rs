// Numeric coercion and order statistics
use serde::Serialize;
use thiserror::Error;

/// Parse a decimal field value. Empty, non-numeric and non-finite input yields `None`
/// so a bad cell can never reach a sorted sample as NaN.
pub fn coerce(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Min, quartiles and max of a sample.
/// Invariant: `min <= q1 <= median <= q3 <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// No values survived coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("empty sample")]
pub struct EmptySample;

/// Nearest-rank five-number summary.
///
/// Quartiles are taken at the 0-based sorted index `floor(n * p)` with no
/// interpolation between neighbours. For `n == 2` this puts Q1 on the minimum
/// and Q3 on the maximum.
pub fn summarize(values: &[f64]) -> Result<FiveNumberSummary, EmptySample> {
    if values.is_empty() {
        return Err(EmptySample);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let rank = |p: f64| sorted[((n as f64 * p).floor() as usize).min(n - 1)];

    Ok(FiveNumberSummary {
        min: sorted[0],
        q1: rank(0.25),
        median: rank(0.5),
        q3: rank(0.75),
        max: sorted[n - 1],
    })
}
