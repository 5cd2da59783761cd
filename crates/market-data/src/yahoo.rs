use std::time::Duration;

use chrono::DateTime;
use screener_core::{CompanyInfo, PriceBar, ScreenerError};
use serde::Deserialize;

use crate::rate_limit::RateLimiter;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// NSE symbols carry the `.NS` suffix on Yahoo Finance.
fn yahoo_symbol(symbol: &str) -> String {
    format!("{}.NS", symbol.to_uppercase())
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartPayload,
}

#[derive(Debug, Deserialize)]
struct ChartPayload {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize, Default)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryPayload,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryPayload {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize, Default)]
struct QuoteSummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialData>,
    #[serde(rename = "defaultKeyStatistics", default)]
    key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize, Default)]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PriceModule {
    #[serde(rename = "longName", default)]
    long_name: Option<String>,
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawNum>,
}

#[derive(Debug, Deserialize, Default)]
struct SummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawNum>,
}

#[derive(Debug, Deserialize, Default)]
struct FinancialData {
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Option<RawNum>,
    #[serde(rename = "returnOnAssets", default)]
    return_on_assets: Option<RawNum>,
    #[serde(rename = "totalDebt", default)]
    total_debt: Option<RawNum>,
}

#[derive(Debug, Deserialize, Default)]
struct KeyStatistics {
    #[serde(rename = "bookValue", default)]
    book_value: Option<RawNum>,
}

/// Yahoo wraps numeric fields as `{"raw": 1.23, "fmt": "1.23"}`.
#[derive(Debug, Deserialize, Default)]
struct RawNum {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: &Option<RawNum>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

/// Client for Yahoo Finance price history and company fundamentals.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl YahooClient {
    pub fn new() -> Result<Self, ScreenerError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(30, Duration::from_secs(60)),
        })
    }

    /// Fetch daily OHLCV history for an NSE symbol over a Yahoo range string
    /// such as "9mo" or "2y".
    ///
    /// Returns bars ascending by date; sessions with incomplete OHLC are
    /// dropped. An empty result means "symbol not found or no history" and
    /// must not be read as zero prices.
    pub async fn daily_bars(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, ScreenerError> {
        self.fetch_chart(&yahoo_symbol(symbol), &symbol.to_uppercase(), range)
            .await
    }

    /// Fetch daily history for an index ticker such as "^NSEI". Index
    /// tickers are passed to Yahoo verbatim, without the `.NS` suffix.
    pub async fn index_bars(
        &self,
        index_ticker: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, ScreenerError> {
        self.fetch_chart(index_ticker, index_ticker, range).await
    }

    async fn fetch_chart(
        &self,
        ticker: &str,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, ScreenerError> {
        let url = format!("{}/v8/finance/chart/{}", BASE_URL, ticker);

        self.rate_limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", "1d"), ("events", "history")])
            .send()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        if response.status().as_u16() == 404 {
            tracing::warn!("No Yahoo chart data for {}", symbol);
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(ScreenerError::Api(format!(
                "HTTP {} fetching bars for {}",
                response.status(),
                symbol
            )));
        }

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        let Some(result) = payload.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) else {
            return Ok(Vec::new());
        };

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let fields = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            );
            let (Some(open), Some(high), Some(low), Some(close)) = fields else {
                continue;
            };
            let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
                continue;
            };

            bars.push(PriceBar {
                date,
                symbol: symbol.to_uppercase(),
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
            });
        }

        // Yahoo occasionally repeats the live session at the tail
        bars.dedup_by(|b, a| b.date == a.date);

        tracing::debug!("Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }

    /// Fetch company fundamentals for an NSE symbol.
    ///
    /// Fields Yahoo does not report stay `None`; `None` company info as a
    /// whole means the symbol is unknown upstream.
    pub async fn company_info(&self, symbol: &str) -> Result<Option<CompanyInfo>, ScreenerError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}",
            BASE_URL,
            yahoo_symbol(symbol)
        );

        self.rate_limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .query(&[(
                "modules",
                "assetProfile,price,summaryDetail,financialData,defaultKeyStatistics",
            )])
            .send()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ScreenerError::Api(format!(
                "HTTP {} fetching company info for {}",
                response.status(),
                symbol
            )));
        }

        let payload: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        let Some(result) = payload.quote_summary.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) else {
            return Ok(None);
        };

        let profile = result.asset_profile.unwrap_or_default();
        let price = result.price.unwrap_or_default();
        let summary = result.summary_detail.unwrap_or_default();
        let financial = result.financial_data.unwrap_or_default();
        let stats = result.key_statistics.unwrap_or_default();

        Ok(Some(CompanyInfo {
            symbol: symbol.to_uppercase(),
            company_name: price.long_name,
            sector: profile.sector,
            industry: profile.industry,
            market_cap: raw(&price.market_cap),
            pe: raw(&summary.trailing_pe),
            book_value: raw(&stats.book_value),
            roe: raw(&financial.return_on_equity),
            // Yahoo reports no ROCE; return on assets is the closest field
            roce: raw(&financial.return_on_assets),
            debt: raw(&financial.total_debt),
        }))
    }
}

#[async_trait::async_trait]
impl screener_core::MarketDataSource for YahooClient {
    async fn daily_bars(&self, symbol: &str, range: &str) -> Result<Vec<PriceBar>, ScreenerError> {
        YahooClient::daily_bars(self, symbol, range).await
    }

    async fn company_info(&self, symbol: &str) -> Result<Option<CompanyInfo>, ScreenerError> {
        YahooClient::company_info(self, symbol).await
    }
}
