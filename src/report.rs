use std::fmt::{self, Write};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::model::AnalysisResult;

/// Currency code shown next to prices: `BRL` for BRL quotes, `USD` otherwise.
pub fn display_currency(currency: &str) -> &'static str {
    if currency == "BRL" { "BRL" } else { "USD" }
}

/// `0.1234` -> `12.34%`
fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Machine-readable outcome of one analysis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView<'a> {
    /// The ticker as typed by the user.
    pub query: String,
    pub not_found: bool,
    pub error: Option<String>,
    pub tried: Vec<String>,
    #[serde(flatten)]
    pub result: Option<&'a AnalysisResult>,
}

impl<'a> ReportView<'a> {
    pub fn new(ticker: &str, outcome: &'a Result<AnalysisResult, AnalysisError>) -> Self {
        match outcome {
            Ok(result) => Self {
                query: ticker.to_string(),
                not_found: false,
                error: None,
                tried: Vec::new(),
                result: Some(result),
            },
            Err(err) => Self {
                query: ticker.to_string(),
                not_found: err.is_not_found(),
                error: Some(err.to_string()),
                tried: match err {
                    AnalysisError::NotFound { tried, .. } => tried.clone(),
                    _ => Vec::new(),
                },
                result: None,
            },
        }
    }
}

pub fn render_json(
    ticker: &str,
    outcome: &Result<AnalysisResult, AnalysisError>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportView::new(ticker, outcome))
}

/// Plain-text report of one analysis.
pub fn render_text(
    ticker: &str,
    outcome: &Result<AnalysisResult, AnalysisError>,
    show_table: bool,
    today: NaiveDate,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match outcome {
        Ok(result) => write_result(&mut out, result, show_table, today)?,
        Err(err) => write_error(&mut out, ticker, err)?,
    }
    Ok(out)
}

fn write_error(out: &mut String, ticker: &str, err: &AnalysisError) -> fmt::Result {
    match err {
        AnalysisError::NotFound { tried, .. } => {
            writeln!(out, "Ticker not found: {}", ticker.trim())?;
            writeln!(out, "  Tried: {}", tried.join(", "))?;
        }
        AnalysisError::InsufficientHistory { .. } => {
            writeln!(out, "Not enough history: {}", err)?;
        }
        AnalysisError::InvalidTicker => {
            writeln!(out, "Please enter a ticker (e.g. AAPL)")?;
        }
        AnalysisError::Provider { .. } => {
            writeln!(out, "Data could not be retrieved, try again later: {}", err)?;
        }
    }
    Ok(())
}

fn write_result(
    out: &mut String,
    result: &AnalysisResult,
    show_table: bool,
    today: NaiveDate,
) -> fmt::Result {
    let ccy = display_currency(&result.currency);

    writeln!(out, "{} ({})", result.ticker, result.resolved_symbol)?;
    writeln!(out, "{}", result.company_name)?;
    writeln!(out, "Date: {}", today.format("%Y-%m-%d"))?;
    writeln!(
        out,
        "History: {} daily prices, {} to {}",
        result.points, result.first_date, result.last_date
    )?;
    writeln!(out, "{}", "=".repeat(60))?;

    writeln!(out, "Price")?;
    writeln!(out, "  Current price:  {:.2} {}", result.last_close, ccy)?;
    writeln!(out, "  50-day average: {:.2} {}", result.last_ma50, ccy)?;
    writeln!(out)?;

    writeln!(out, "Historical multiple")?;
    writeln!(out, "  Current:         {:.2}", result.current_multiple)?;
    writeln!(out, "  Historical mean: {:.2}", result.historical_mean_multiple)?;
    if result.higher_than_today_pct.is_finite() {
        writeln!(
            out,
            "  Historical multiple has been higher than today's value {:.2}% of the time.",
            result.higher_than_today_pct
        )?;
    } else {
        writeln!(out, "  Today's multiple is undefined, no comparison with history.")?;
    }
    writeln!(out)?;

    writeln!(out, "Buy recommendations")?;
    for summary in &result.per_horizon {
        match summary.best() {
            Some(best) => writeln!(
                out,
                "  {:>5}  return {:>8}  best buy below {:.2}",
                format!("{}d", summary.horizon),
                percent(best.median_return),
                best.threshold
            )?,
            None => writeln!(
                out,
                "  {:>5}  not enough history",
                format!("{}d", summary.horizon)
            )?,
        }
    }

    if show_table && !result.sweep.is_empty() {
        writeln!(out)?;
        write!(out, "  {:>10}", "Threshold")?;
        for summary in &result.per_horizon {
            let count = format!("n{}d", summary.horizon);
            let median = format!("med{}d", summary.horizon);
            write!(out, " {:>8} {:>10}", count, median)?;
        }
        writeln!(out)?;
        for row in &result.sweep {
            write!(out, "  {:>10.4}", row.threshold)?;
            for (count, median) in row.counts.iter().zip(&row.median_returns) {
                let median = median.map(percent).unwrap_or_else(|| "-".to_string());
                write!(out, " {:>8} {:>10}", count, median)?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}
