mod file;
mod yahoo;

pub use file::{FileProvider, parse_price_lines};
pub use yahoo::YahooClient;

use crate::error::ProviderError;
use crate::model::{PricePoint, Profile};

/// Source of daily price histories.
///
/// `daily_history` returns the whole available history at daily interval
/// with both raw and adjusted closes. An empty vector means the symbol is
/// unknown to the provider; `Err` means the provider could not be asked.
#[allow(async_fn_in_trait)]
pub trait PriceProvider {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<PricePoint>, ProviderError>;

    /// Display name and quote currency.
    async fn profile(&self, symbol: &str) -> Result<Profile, ProviderError>;
}
