use thiserror::Error;

/// Failures talking to a price data provider.
///
/// An unknown symbol is not an error: providers answer it with an empty
/// history so the loader can move on to the next candidate.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("API error [{code}]: {description}")]
    Api { code: String, description: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no adjusted close in the history of {0}")]
    MissingAdjustedClose(String),

    #[error("{symbol} answered with {granularity} bars, daily bars are required")]
    Granularity { symbol: String, granularity: String },
}

/// Why one analysis could not produce a result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("ticker is empty")]
    InvalidTicker,

    #[error("ticker {ticker} not found (tried {})", .tried.join(", "))]
    NotFound { ticker: String, tried: Vec<String> },

    #[error("{symbol} has {points} daily prices, at least {required} are needed")]
    InsufficientHistory {
        symbol: String,
        points: usize,
        required: usize,
    },

    #[error("could not retrieve {symbol}: {source}")]
    Provider {
        symbol: String,
        #[source]
        source: ProviderError,
    },
}

impl AnalysisError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalysisError::NotFound { .. })
    }
}
