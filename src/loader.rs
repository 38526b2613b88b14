use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::model::PriceSeries;
use crate::provider::PriceProvider;

/// Suffix of the São Paulo exchange listings.
pub const EXCHANGE_SUFFIX: &str = ".SA";

/// Strip every whitespace character from user input.
pub fn normalize_ticker(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Symbol spellings to try, in order.
///
/// A trailing digit marks a share class (`PETR4`): try the exchange listing,
/// the bare stem, then the other class (`3` swaps to `4`, anything else to
/// `3`). Otherwise try the raw ticker, then its class-3 and class-4
/// listings. Empty spellings are dropped.
pub fn candidate_symbols(ticker: &str) -> Vec<String> {
    let candidates = match ticker.chars().last() {
        None => return Vec::new(),
        Some(last) if last.is_ascii_digit() => {
            let stem = &ticker[..ticker.len() - 1];
            let other_class = if last == '3' { '4' } else { '3' };
            vec![
                format!("{ticker}{EXCHANGE_SUFFIX}"),
                stem.to_string(),
                format!("{stem}{other_class}{EXCHANGE_SUFFIX}"),
            ]
        }
        Some(_) => vec![
            ticker.to_string(),
            format!("{ticker}3{EXCHANGE_SUFFIX}"),
            format!("{ticker}4{EXCHANGE_SUFFIX}"),
        ],
    };

    candidates.into_iter().filter(|c| !c.is_empty()).collect()
}

/// Fetch the history of the first candidate symbol the provider knows.
///
/// Candidates are tried one at a time and the search stops at the first
/// non-empty history. A provider failure aborts the search instead of being
/// read as "not found".
pub async fn load_series<P: PriceProvider>(
    provider: &P,
    ticker: &str,
) -> Result<PriceSeries, AnalysisError> {
    let ticker = normalize_ticker(ticker);
    if ticker.is_empty() {
        return Err(AnalysisError::InvalidTicker);
    }

    let candidates = candidate_symbols(&ticker);
    for symbol in &candidates {
        debug!(symbol = %symbol, "requesting daily history");
        let points = provider
            .daily_history(symbol)
            .await
            .map_err(|source| AnalysisError::Provider {
                symbol: symbol.clone(),
                source,
            })?;

        if points.is_empty() {
            debug!(symbol = %symbol, "no data");
            continue;
        }

        let series = PriceSeries::new(symbol.clone(), points);
        info!(ticker = %ticker, symbol = %symbol, points = series.len(), "resolved ticker");
        return Ok(series);
    }

    warn!(ticker = %ticker, tried = ?candidates, "ticker not found");
    Err(AnalysisError::NotFound {
        ticker,
        tried: candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" pe tr4\t"), "petr4");
        assert_eq!(normalize_ticker("   "), "");
    }

    #[test]
    fn test_candidates_class_four() {
        assert_eq!(
            candidate_symbols("PETR4"),
            vec!["PETR4.SA", "PETR", "PETR3.SA"]
        );
    }

    #[test]
    fn test_candidates_class_three() {
        assert_eq!(
            candidate_symbols("VALE3"),
            vec!["VALE3.SA", "VALE", "VALE4.SA"]
        );
    }

    #[test]
    fn test_candidates_other_digit() {
        assert_eq!(
            candidate_symbols("TAEE11"),
            vec!["TAEE11.SA", "TAEE1", "TAEE13.SA"]
        );
    }

    #[test]
    fn test_candidates_plain_ticker() {
        assert_eq!(
            candidate_symbols("AAPL"),
            vec!["AAPL", "AAPL3.SA", "AAPL4.SA"]
        );
    }

    #[test]
    fn test_candidates_single_digit() {
        assert_eq!(candidate_symbols("7"), vec!["7.SA", "3.SA"]);
        assert!(candidate_symbols("").is_empty());
    }
}
