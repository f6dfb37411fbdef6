//! Trailing simple moving averages.
//!
//! Two variants are deliberately kept separate:
//!
//! - `sma` for the yield series, which has no gaps: the first `w - 1` outputs
//!   are absent, then each output is the mean of the trailing `w` values.
//! - `sma_with_gaps` for projected value series, where individual points can
//!   be absent (a shifted yield of <= 0 has no defined value): the trailing
//!   window averages only the present values instead of propagating absence.
//!
//! The asymmetry mirrors the two consumers and must be preserved.

/// Trailing simple moving average over a gap-free sequence.
///
/// Output length always equals input length.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
        } else {
            let sum: f64 = values[i + 1 - window..=i].iter().sum();
            out.push(Some(sum / window as f64));
        }
    }
    out
}

/// Trailing moving average that averages only the present values in each
/// window (partial-window averaging).
///
/// Output length always equals input length. An output is absent only before
/// the window fills or when the window contains no present values at all.
pub fn sma_with_gaps(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
            continue;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in values[i + 1 - window..=i].iter().flatten() {
            sum += *v;
            count += 1;
        }
        out.push(if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        });
    }
    out
}
