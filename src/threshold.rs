//! Threshold sweep over the historical multiple.
//!
//! For each candidate threshold the strategy "buy whenever the multiple is at
//! or below the threshold" is scored by the median forward return of the
//! qualifying dates. The best threshold per horizon is the first one, in
//! ascending order, reaching the highest median.

use std::collections::HashMap;

use chrono::NaiveDate;
use stats::{find_min_max, linspace, median};

use crate::model::{
    BestThreshold, ForwardReturns, HorizonSummary, JoinedRecord, MultipleSeries, N_THRESHOLDS,
    ThresholdRow,
};

/// Left join of the multiples with every horizon's forward returns on date.
///
/// Dates whose multiple is undefined are dropped; a missing return only
/// leaves that horizon's slot empty.
pub fn join(multiples: &MultipleSeries, returns: &[ForwardReturns]) -> Vec<JoinedRecord> {
    let by_date: Vec<HashMap<NaiveDate, f64>> = returns
        .iter()
        .map(|r| {
            r.values
                .iter()
                .filter_map(|fr| fr.value.map(|v| (fr.date, v)))
                .collect()
        })
        .collect();

    multiples
        .points
        .iter()
        .filter(|p| p.multiple.is_finite())
        .map(|p| JoinedRecord {
            date: p.date,
            multiple: p.multiple,
            returns: by_date.iter().map(|m| m.get(&p.date).copied()).collect(),
        })
        .collect()
}

/// `N_THRESHOLDS` evenly spaced thresholds from the smallest to the largest
/// joined multiple. Empty when there are no records.
pub fn threshold_grid(records: &[JoinedRecord]) -> Vec<f64> {
    if records.is_empty() {
        return Vec::new();
    }
    let multiples: Vec<f64> = records.iter().map(|r| r.multiple).collect();
    let (lo, hi) = find_min_max(&multiples);
    linspace(lo, hi, N_THRESHOLDS)
}

/// Score every threshold of `grid` for `n_horizons` horizons.
pub fn sweep(records: &[JoinedRecord], grid: &[f64], n_horizons: usize) -> Vec<ThresholdRow> {
    grid.iter()
        .map(|&threshold| {
            let mut counts = Vec::with_capacity(n_horizons);
            let mut median_returns = Vec::with_capacity(n_horizons);

            for h in 0..n_horizons {
                let values: Vec<f64> = records
                    .iter()
                    .filter(|r| r.multiple <= threshold)
                    .filter_map(|r| r.returns.get(h).copied().flatten())
                    .collect();
                counts.push(values.len());
                median_returns.push(median(&values));
            }

            ThresholdRow {
                threshold,
                counts,
                median_returns,
            }
        })
        .collect()
}

/// Highest median for horizon slot `h`; ties keep the lowest threshold and
/// rows without a median never win.
pub fn best_threshold(rows: &[ThresholdRow], h: usize) -> Option<BestThreshold> {
    let mut best: Option<BestThreshold> = None;

    for row in rows {
        let Some(median_return) = row.median_returns.get(h).copied().flatten() else {
            continue;
        };
        if best.is_none_or(|b| median_return > b.median_return) {
            best = Some(BestThreshold {
                threshold: row.threshold,
                median_return,
            });
        }
    }

    best
}

/// Result of a full scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScan {
    pub rows: Vec<ThresholdRow>,
    pub per_horizon: Vec<HorizonSummary>,
}

/// Grid, sweep and per-horizon selection in one call. `horizons` labels the
/// return slots of `records`, in the same order.
pub fn optimize(records: &[JoinedRecord], horizons: &[usize]) -> ThresholdScan {
    let grid = threshold_grid(records);
    let rows = sweep(records, &grid, horizons.len());

    let per_horizon = horizons
        .iter()
        .enumerate()
        .map(|(h, &horizon)| HorizonSummary::new(horizon, best_threshold(&rows, h)))
        .collect();

    ThresholdScan { rows, per_horizon }
}
