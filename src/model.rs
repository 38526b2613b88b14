use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trailing window of the moving average behind the historical multiple.
pub const MA_WINDOW: usize = 50;

/// Number of candidate thresholds in the sweep.
pub const N_THRESHOLDS: usize = 50;

/// Forward horizons (trading periods) used when none are configured.
pub const DEFAULT_HORIZONS: [usize; 2] = [180, 360];

/// One trading day of a price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub adjusted_close: f64,
}

/// Chronological daily history for one resolved symbol.
///
/// Construction sorts by date and keeps the last observation for a repeated
/// date, so `date` is unique within the series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);

        let mut unique: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match unique.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => unique.push(point),
            }
        }

        Self {
            symbol: symbol.into(),
            points: unique,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn adjusted_closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.adjusted_close).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiplePoint {
    pub date: NaiveDate,
    /// NaN when the moving average was zero or invalid.
    pub multiple: f64,
}

/// Adjusted close over its 50-day average, starting at the 50th point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipleSeries {
    pub points: Vec<MultiplePoint>,
}

impl MultipleSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Multiples that are defined (finite).
    pub fn defined(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.multiple)
            .filter(|m| m.is_finite())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardReturn {
    pub date: NaiveDate,
    /// `None` for the last `horizon` dates and where the ratio is not finite.
    pub value: Option<f64>,
}

/// Forward returns for one horizon, aligned with the price series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReturns {
    pub horizon: usize,
    pub values: Vec<ForwardReturn>,
}

impl ForwardReturns {
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|r| r.value.is_some()).count()
    }
}

/// A date with a defined multiple and its forward return per horizon,
/// in the order the horizons were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub date: NaiveDate,
    pub multiple: f64,
    pub returns: Vec<Option<f64>>,
}

/// One row of the threshold sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRow {
    pub threshold: f64,
    /// Records with `multiple <= threshold` and a defined return, per horizon.
    pub counts: Vec<usize>,
    pub median_returns: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestThreshold {
    pub threshold: f64,
    pub median_return: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonSummary {
    pub horizon: usize,
    /// `None` when no threshold bucket had a defined median.
    pub best_threshold: Option<f64>,
    pub best_median_return: Option<f64>,
}

impl HorizonSummary {
    pub fn new(horizon: usize, best: Option<BestThreshold>) -> Self {
        Self {
            horizon,
            best_threshold: best.map(|b| b.threshold),
            best_median_return: best.map(|b| b.median_return),
        }
    }

    pub fn best(&self) -> Option<BestThreshold> {
        match (self.best_threshold, self.best_median_return) {
            (Some(threshold), Some(median_return)) => Some(BestThreshold {
                threshold,
                median_return,
            }),
            _ => None,
        }
    }
}

/// Display metadata for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub currency: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Company name not available".to_string(),
            currency: "USD".to_string(),
        }
    }
}

/// Everything one analysis produces, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ticker: String,
    pub resolved_symbol: String,
    pub company_name: String,
    pub currency: String,
    pub points: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub last_close: f64,
    pub last_adjusted_close: f64,
    /// 50-day average of the raw close.
    pub last_ma50: f64,
    /// Raw close over `last_ma50`.
    pub current_multiple: f64,
    pub historical_mean_multiple: f64,
    pub higher_than_today_pct: f64,
    pub per_horizon: Vec<HorizonSummary>,
    pub sweep: Vec<ThresholdRow>,
}
