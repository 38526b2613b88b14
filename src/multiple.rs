use indicators::rolling_mean;
use stats::{count_greater, mean};

use crate::model::{MA_WINDOW, MultiplePoint, MultipleSeries, PriceSeries};

/// 50-sample trailing average; near the start the window shrinks to the
/// samples available, so the first value is the first price itself.
pub fn ma50(prices: &[f64]) -> Vec<f64> {
    rolling_mean(prices, MA_WINDOW, 1)
}

/// `price / average`, NaN when the average is not a positive number.
pub fn ratio(price: f64, average: f64) -> f64 {
    if average > 0.0 && average.is_finite() {
        price / average
    } else {
        f64::NAN
    }
}

/// Price over its own `ma50` at every position, warm-up included.
pub fn multiple_curve(prices: &[f64]) -> Vec<f64> {
    prices
        .iter()
        .zip(ma50(prices))
        .map(|(&price, average)| ratio(price, average))
        .collect()
}

/// Adjusted-close multiples from the 50th point on.
pub fn historical_multiples(series: &PriceSeries) -> MultipleSeries {
    let curve = multiple_curve(&series.adjusted_closes());

    let points = series
        .points()
        .iter()
        .zip(curve)
        .skip(MA_WINDOW - 1)
        .map(|(p, multiple)| MultiplePoint {
            date: p.date,
            multiple,
        })
        .collect();

    MultipleSeries { points }
}

/// Where today stands against history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultipleSummary {
    pub last_close: f64,
    pub last_adjusted_close: f64,
    /// Average of the raw close.
    pub last_ma50: f64,
    /// Raw close over `last_ma50`.
    pub current_multiple: f64,
    pub historical_mean: f64,
    /// Share of defined historical multiples above the current one, in
    /// percent. NaN when either side is undefined.
    pub higher_than_today_pct: f64,
}

/// Summarize a non-empty series against its historical multiples.
///
/// The current multiple uses the raw close and its average; the historical
/// series is built from adjusted closes.
pub fn summarize(series: &PriceSeries, multiples: &MultipleSeries) -> Option<MultipleSummary> {
    let last = series.last()?;
    let last_ma50 = ma50(&series.closes()).last().copied()?;
    let current_multiple = ratio(last.close, last_ma50);

    let defined = multiples.defined();
    let higher_than_today_pct = if defined.is_empty() || !current_multiple.is_finite() {
        f64::NAN
    } else {
        100.0 * count_greater(&defined, current_multiple) as f64 / defined.len() as f64
    };

    Some(MultipleSummary {
        last_close: last.close,
        last_adjusted_close: last.adjusted_close,
        last_ma50,
        current_multiple,
        historical_mean: mean(&defined).unwrap_or(f64::NAN),
        higher_than_today_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricePoint;
    use chrono::{Duration, NaiveDate};

    fn series_from(closes: &[f64], adjusted: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let points = closes
            .iter()
            .zip(adjusted)
            .enumerate()
            .map(|(i, (&close, &adjusted_close))| PricePoint {
                date: start + Duration::days(i as i64),
                close,
                adjusted_close,
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    #[test]
    fn test_ma50_first_point_is_its_own_price() {
        let prices: Vec<f64> = (1..=60).map(|i| i as f64).collect();
        let avg = ma50(&prices);

        assert_eq!(avg[0], 1.0);
        assert!((avg[1] - 1.5).abs() < 1e-10);
        // full window from index 49: mean(1..=50) = 25.5
        assert!((avg[49] - 25.5).abs() < 1e-10);
        assert!((avg[59] - 35.5).abs() < 1e-10);
    }

    #[test]
    fn test_multiple_curve_defined_in_warm_up() {
        let curve = multiple_curve(&[10.0, 20.0]);
        assert_eq!(curve[0], 1.0);
        assert!((curve[1] - 20.0 / 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_historical_multiples_length() {
        for n in [50usize, 51, 120] {
            let prices: Vec<f64> = (0..n).map(|i| 10.0 + i as f64).collect();
            let series = series_from(&prices, &prices);
            assert_eq!(historical_multiples(&series).len(), n - 49);
        }
    }

    #[test]
    fn test_historical_multiples_use_adjusted_close() {
        let closes = vec![100.0; 60];
        let adjusted: Vec<f64> = (0..60).map(|i| if i == 59 { 60.0 } else { 50.0 }).collect();
        let series = series_from(&closes, &adjusted);

        let multiples = historical_multiples(&series);
        let last = multiples.points.last().unwrap();
        let expected = 60.0 / ((49.0 * 50.0 + 60.0) / 50.0);
        assert!((last.multiple - expected).abs() < 1e-12);
        assert_eq!(last.date, series.last().unwrap().date);
    }

    #[test]
    fn test_zero_average_is_undefined() {
        let prices = vec![0.0; 55];
        let series = series_from(&prices, &prices);
        let multiples = historical_multiples(&series);

        assert_eq!(multiples.len(), 6);
        assert!(multiples.points.iter().all(|p| p.multiple.is_nan()));
        assert!(multiples.defined().is_empty());

        let summary = summarize(&series, &multiples).unwrap();
        assert!(summary.current_multiple.is_nan());
        assert!(summary.historical_mean.is_nan());
    }

    #[test]
    fn test_summary_uses_raw_close_for_current() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let adjusted: Vec<f64> = closes.iter().map(|c| c * 0.5).collect();
        let series = series_from(&closes, &adjusted);
        let multiples = historical_multiples(&series);

        let summary = summarize(&series, &multiples).unwrap();
        // mean(110..=159) = 134.5
        assert!((summary.last_ma50 - 134.5).abs() < 1e-10);
        assert!((summary.current_multiple - 159.0 / 134.5).abs() < 1e-12);
        assert_eq!(summary.last_close, 159.0);
        assert_eq!(summary.last_adjusted_close, 79.5);
    }

    #[test]
    fn test_undefined_current_multiple_has_no_share() {
        // raw closes at zero, adjusted history well defined
        let closes = vec![0.0; 60];
        let adjusted: Vec<f64> = (10..70).map(|i| i as f64).collect();
        let series = series_from(&closes, &adjusted);
        let multiples = historical_multiples(&series);

        let summary = summarize(&series, &multiples).unwrap();
        assert_eq!(multiples.defined().len(), 11);
        assert!(summary.current_multiple.is_nan());
        assert!(summary.historical_mean.is_finite());
        assert!(summary.higher_than_today_pct.is_nan());
    }

    #[test]
    fn test_higher_than_today_pct() {
        // flat history, then a drop: today's multiple is the lowest
        let mut prices = vec![10.0; 59];
        prices.push(5.0);
        let series = series_from(&prices, &prices);
        let multiples = historical_multiples(&series);

        let summary = summarize(&series, &multiples).unwrap();
        // 11 historical multiples, 10 of them equal to 1.0 and above today's
        assert!((summary.higher_than_today_pct - 100.0 * 10.0 / 11.0).abs() < 1e-10);
    }
}
