pub mod analysis;
pub mod config;
pub mod error;
pub mod forward;
pub mod loader;
pub mod model;
pub mod multiple;
pub mod provider;
pub mod report;
pub mod threshold;

pub use analysis::{analyze, analyze_series};
pub use config::Config;
pub use error::{AnalysisError, ProviderError};
pub use loader::{candidate_symbols, load_series, normalize_ticker};
pub use model::*;
pub use provider::{FileProvider, PriceProvider, YahooClient};
pub use report::{render_json, render_text};
