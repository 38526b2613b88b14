//! Yahoo Finance chart API client.
//!
//! One endpoint serves both needs: an explicit `period1`/`period2` window
//! for the daily history and a short range for the `meta` block carrying the
//! display name and currency.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::PriceProvider;
use crate::error::ProviderError;
use crate::model::{PricePoint, Profile};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 1900-01-01T00:00:00Z, before any listing Yahoo carries.
const EARLIEST_PERIOD: i64 = -2_208_988_800;

const DAILY: &str = "1d";

/// Time span of one chart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    /// Every daily bar up to now.
    Full,
    /// The last few sessions; enough for `meta`.
    Recent,
}

impl Window {
    fn query(self, now: i64) -> Vec<(&'static str, String)> {
        let mut query = match self {
            Window::Full => vec![
                ("period1", EARLIEST_PERIOD.to_string()),
                ("period2", now.to_string()),
            ],
            Window::Recent => vec![("range", "5d".to_string())],
        };
        query.extend([
            ("interval", DAILY.to_string()),
            ("events", "div,split".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ]);
        query
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    currency: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
    #[serde(rename = "dataGranularity")]
    data_granularity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

pub struct YahooClient {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str =
        "https://query1.finance.yahoo.com/v8/finance/chart";

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let invalid = |reason: String| {
            ProviderError::Parse(format!("invalid base url {}: {}", base_url, reason))
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("cannot hold a path".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The symbol becomes one percent-encoded path segment.
    fn chart_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(symbol);
        }
        url
    }

    /// `Ok(None)` when Yahoo does not know the symbol.
    async fn chart(
        &self,
        symbol: &str,
        window: Window,
    ) -> Result<Option<ChartData>, ProviderError> {
        let response = self
            .client
            .get(self.chart_url(symbol))
            .query(&window.query(Utc::now().timestamp()))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(symbol, "chart endpoint answered 404");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_chart(&body)
    }
}

impl PriceProvider for YahooClient {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<PricePoint>, ProviderError> {
        match self.chart(symbol, Window::Full).await? {
            Some(data) => chart_points(symbol, &data),
            None => Ok(Vec::new()),
        }
    }

    async fn profile(&self, symbol: &str) -> Result<Profile, ProviderError> {
        Ok(self
            .chart(symbol, Window::Recent)
            .await?
            .map(|data| chart_profile(&data.meta))
            .unwrap_or_default())
    }
}

fn parse_chart(body: &str) -> Result<Option<ChartData>, ProviderError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Ok(None);
        }
        return Err(ProviderError::Api {
            code: error.code,
            description: error.description,
        });
    }

    Ok(response
        .chart
        .result
        .and_then(|results| results.into_iter().next()))
}

/// Rows missing either close are dropped. A history with prices but no
/// adjusted close column is unusable, and so is one made of bars coarser
/// than a day.
fn chart_points(symbol: &str, data: &ChartData) -> Result<Vec<PricePoint>, ProviderError> {
    if let Some(granularity) = data.meta.data_granularity.as_deref().filter(|g| *g != DAILY) {
        return Err(ProviderError::Granularity {
            symbol: symbol.to_string(),
            granularity: granularity.to_string(),
        });
    }

    let Some(quote) = data.indicators.quote.first() else {
        return Ok(Vec::new());
    };
    if data.timestamp.is_empty() {
        return Ok(Vec::new());
    }

    let adjusted = data
        .indicators
        .adjclose
        .as_ref()
        .and_then(|a| a.first())
        .ok_or_else(|| ProviderError::MissingAdjustedClose(symbol.to_string()))?;

    let points = data
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = quote.close.get(i).copied().flatten()?;
            let adjusted_close = adjusted.adjclose.get(i).copied().flatten()?;
            Some(PricePoint {
                date: trading_date(ts, data.meta.gmtoffset)?,
                close,
                adjusted_close,
            })
        })
        .collect();

    Ok(points)
}

/// Exchange-local calendar date of a bar timestamp.
fn trading_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn chart_profile(meta: &ChartMeta) -> Profile {
    let defaults = Profile::default();
    Profile {
        name: meta
            .long_name
            .clone()
            .or_else(|| meta.short_name.clone())
            .unwrap_or(defaults.name),
        currency: meta.currency.clone().unwrap_or(defaults.currency),
    }
}
