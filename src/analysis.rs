use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::forward::forward_return_table;
use crate::loader::{load_series, normalize_ticker};
use crate::model::{AnalysisResult, MA_WINDOW, PriceSeries, Profile};
use crate::multiple::{historical_multiples, summarize};
use crate::provider::PriceProvider;
use crate::threshold::{join, optimize};

/// Resolve `ticker`, fetch its history and run the full analysis.
///
/// Every call starts from scratch; nothing is shared between calls.
pub async fn analyze<P: PriceProvider>(
    provider: &P,
    ticker: &str,
    horizons: &[usize],
) -> Result<AnalysisResult, AnalysisError> {
    let series = load_series(provider, ticker).await?;

    let profile = match provider.profile(series.symbol()).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(symbol = series.symbol(), error = %e, "profile lookup failed, using defaults");
            Profile::default()
        }
    };

    analyze_series(&normalize_ticker(ticker), &series, &profile, horizons)
}

/// The pure part of the pipeline: multiples, forward returns and the
/// threshold scan for an already loaded series.
pub fn analyze_series(
    ticker: &str,
    series: &PriceSeries,
    profile: &Profile,
    horizons: &[usize],
) -> Result<AnalysisResult, AnalysisError> {
    let insufficient = || AnalysisError::InsufficientHistory {
        symbol: series.symbol().to_string(),
        points: series.len(),
        required: MA_WINDOW,
    };

    if series.len() < MA_WINDOW {
        return Err(insufficient());
    }
    let (Some(first), Some(last)) = (series.points().first(), series.last()) else {
        return Err(insufficient());
    };

    let multiples = historical_multiples(series);
    let summary = summarize(series, &multiples).ok_or_else(insufficient)?;

    let returns = forward_return_table(series, horizons);
    let records = join(&multiples, &returns);
    info!(
        symbol = series.symbol(),
        multiples = multiples.len(),
        records = records.len(),
        "joined multiples with forward returns"
    );

    let scan = optimize(&records, horizons);
    for best in &scan.per_horizon {
        debug!(
            horizon = best.horizon,
            threshold = ?best.best_threshold,
            median_return = ?best.best_median_return,
            "best threshold"
        );
    }

    Ok(AnalysisResult {
        ticker: ticker.to_uppercase(),
        resolved_symbol: series.symbol().to_string(),
        company_name: profile.name.clone(),
        currency: profile.currency.clone(),
        points: series.len(),
        first_date: first.date,
        last_date: last.date,
        last_close: summary.last_close,
        last_adjusted_close: summary.last_adjusted_close,
        last_ma50: summary.last_ma50,
        current_multiple: summary.current_multiple,
        historical_mean_multiple: summary.historical_mean,
        higher_than_today_pct: summary.higher_than_today_pct,
        per_horizon: scan.per_horizon,
        sweep: scan.rows,
    })
}
