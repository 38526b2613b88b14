use stats::mean;

/// Trailing rolling mean over `window` samples.
///
/// # Arguments
///
/// * `data` - A slice of f64 values in chronological order.
/// * `window` - The number of trailing samples averaged at each position.
/// * `min_periods` - Minimum number of finite samples the window must hold.
///
/// # Returns
///
/// A Vec<f64> of the same length as `data`. Near the start the window is
/// truncated to the samples available, so with `min_periods = 1` the first
/// value equals the first sample. Positions with fewer than `min_periods`
/// finite samples are NaN.
pub fn rolling_mean(data: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; data.len()];
    }

    (0..data.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &data[start..=i];
            let finite = slice.iter().filter(|v| v.is_finite()).count();
            if finite < min_periods.max(1) {
                return f64::NAN;
            }
            mean(slice).unwrap_or(f64::NAN)
        })
        .collect()
}
