//! Summary statistics over per-operation samples.

use super::BenchStats;

/// Compute min, median (p50), p95 and max from ns/op samples.
///
/// # Panics
/// Panics if `samples` is empty.
#[must_use]
pub fn compute_stats(samples: &[u64]) -> BenchStats {
    assert!(!samples.is_empty(), "samples must not be empty");

    let mut sorted: Vec<u64> = samples.to_vec();
    sorted.sort_unstable();

    BenchStats {
        min_ns: sorted[0],
        median_ns: percentile(&sorted, 50),
        p95_ns: percentile(&sorted, 95),
        max_ns: sorted[sorted.len() - 1],
    }
}

/// Nearest-rank percentile of a sorted slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[u64], p: u32) -> u64 {
    assert!(!sorted.is_empty());
    assert!(p <= 100);

    let n = sorted.len();
    if p == 0 {
        return sorted[0];
    }
    if p == 100 {
        return sorted[n - 1];
    }

    // ceil((p/100) * n), 1-based
    let rank = ((f64::from(p) / 100.0) * n as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(n - 1)]
}

/// Ratio of `median_ns` to `baseline_ns`, `None` when the baseline is zero.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ratio(median_ns: u64, baseline_ns: u64) -> Option<f64> {
    if baseline_ns == 0 {
        None
    } else {
        Some(median_ns as f64 / baseline_ns as f64)
    }
}
