// ============================================================================
// Mean
// ============================================================================

/// Arithmetic mean of the finite values in `data`.
///
/// NaN and infinite entries are skipped. Returns `None` when nothing is left.
pub fn mean(data: &[f64]) -> Option<f64> {
    let (sum, count) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// ============================================================================
// Median (average of the two middle values for even counts)
// ============================================================================

pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

// ============================================================================
// Min / Max
// ============================================================================

/// Smallest and largest value. NaN entries never compare and are ignored;
/// an empty slice yields `(INFINITY, NEG_INFINITY)`.
pub fn find_min_max(data: &[f64]) -> (f64, f64) {
    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;

    for &val in data {
        if val < min_val {
            min_val = val;
        }
        if val > max_val {
            max_val = val;
        }
    }

    (min_val, max_val)
}

// ============================================================================
// Evenly spaced grid, both ends inclusive
// ============================================================================

/// `num` points from `start` to `stop`.
///
/// Point `k` is `start + k * step` with `step = (stop - start) / (num - 1)`,
/// and the last point is pinned to `stop` so rounding never pushes it past
/// the observed maximum.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut grid: Vec<f64> = (0..num).map(|k| start + k as f64 * step).collect();
            grid[num - 1] = stop;
            grid
        }
    }
}

/// Number of entries strictly greater than `value`.
pub fn count_greater(data: &[f64], value: f64) -> usize {
    data.iter().filter(|&&v| v > value).count()
}
