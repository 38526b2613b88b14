use crate::model::{ForwardReturn, ForwardReturns, PriceSeries};

/// `prices[i + horizon] / prices[i] - 1` for every position.
///
/// `horizon` counts positions, not calendar days. The last `horizon`
/// positions have no future price and stay `None`, as do non-finite ratios.
pub fn forward_return_values(prices: &[f64], horizon: usize) -> Vec<Option<f64>> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &base)| {
            let future = *prices.get(i.checked_add(horizon)?)?;
            let ret = future / base - 1.0;
            ret.is_finite().then_some(ret)
        })
        .collect()
}

/// Forward returns of the adjusted close for one horizon, keyed by date.
pub fn forward_returns(series: &PriceSeries, horizon: usize) -> ForwardReturns {
    let values = forward_return_values(&series.adjusted_closes(), horizon)
        .into_iter()
        .zip(series.points())
        .map(|(value, p)| ForwardReturn { date: p.date, value })
        .collect();

    ForwardReturns { horizon, values }
}

/// One `ForwardReturns` per horizon, in the given order.
pub fn forward_return_table(series: &PriceSeries, horizons: &[usize]) -> Vec<ForwardReturns> {
    horizons
        .iter()
        .map(|&horizon| forward_returns(series, horizon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricePoint;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_forward_return_values() {
        let prices = vec![100.0, 110.0, 121.0, 99.0];
        let returns = forward_return_values(&prices, 1);

        assert_eq!(returns.len(), 4);
        assert!((returns[0].unwrap() - 0.1).abs() < 1e-10);
        assert!((returns[1].unwrap() - 0.1).abs() < 1e-10);
        assert!((returns[2].unwrap() - (99.0 / 121.0 - 1.0)).abs() < 1e-10);
        assert!(returns[3].is_none());

        let two = forward_return_values(&prices, 2);
        assert!((two[0].unwrap() - 0.21).abs() < 1e-10);
        assert!(two[2].is_none() && two[3].is_none());
    }

    #[test]
    fn test_defined_count_is_len_minus_horizon() {
        let prices: Vec<f64> = (0..400).map(|i| 10.0 + 0.1 * i as f64).collect();
        for horizon in [0usize, 1, 180, 360, 399, 400, 1000, usize::MAX] {
            let defined = forward_return_values(&prices, horizon)
                .iter()
                .filter(|r| r.is_some())
                .count();
            assert_eq!(defined, prices.len().saturating_sub(horizon));
        }
    }

    #[test]
    fn test_zero_base_price_is_undefined() {
        let returns = forward_return_values(&[0.0, 1.0, 2.0], 1);
        assert!(returns[0].is_none());
        assert_eq!(returns[1], Some(1.0));
    }

    #[test]
    fn test_forward_returns_keyed_by_date() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let points = (0..5)
            .map(|i| PricePoint {
                date: start + Duration::days(i),
                close: 1.0,
                adjusted_close: 10.0 + i as f64,
            })
            .collect();
        let series = PriceSeries::new("TEST", points);

        let table = forward_return_table(&series, &[2, 4]);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].horizon, 2);
        assert_eq!(table[0].defined_count(), 3);
        assert_eq!(table[1].defined_count(), 1);
        assert_eq!(table[0].values[1].date, start + Duration::days(1));
        assert!((table[0].values[1].value.unwrap() - (13.0 / 11.0 - 1.0)).abs() < 1e-12);
    }
}
