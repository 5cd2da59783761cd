use crate::{CompanyInfo, PriceBar, ScreenerError};
use async_trait::async_trait;

/// Source of per-symbol price history and fundamentals.
///
/// An empty bar series or a `None` company info means "not found upstream";
/// callers must skip the symbol rather than score zeros.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn daily_bars(&self, symbol: &str, range: &str) -> Result<Vec<PriceBar>, ScreenerError>;

    async fn company_info(&self, symbol: &str) -> Result<Option<CompanyInfo>, ScreenerError>;
}
