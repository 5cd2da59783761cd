use std::time::Duration;

use screener_core::ScreenerError;
use serde::Deserialize;

use crate::rate_limit::RateLimiter;

const ARCHIVES_BASE_URL: &str = "https://nsearchives.nseindia.com";
const SITE_BASE_URL: &str = "https://www.nseindia.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Which NSE listing board to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Main,
    Sme,
}

impl Board {
    fn listing_path(&self) -> &'static str {
        match self {
            Board::Main => "/content/equities/EQUITY_L.csv",
            Board::Sme => "/emerge/corporates/content/SME_EQUITY_L.csv",
        }
    }

    /// The main board is filtered to the EQ series; SME listings carry no
    /// comparable series discipline.
    fn series_filter(&self) -> Option<&'static str> {
        match self {
            Board::Main => Some("EQ"),
            Board::Sme => None,
        }
    }
}

/// One row of an exchange listing file.
#[derive(Debug, Clone)]
pub struct ListedCompany {
    pub symbol: String,
    pub name: String,
}

/// One constituent row of an NSE index snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConstituent {
    pub symbol: String,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(rename = "dayHigh", default)]
    pub day_high: Option<f64>,
    #[serde(rename = "dayLow", default)]
    pub day_low: Option<f64>,
    #[serde(rename = "lastPrice", default)]
    pub last_price: Option<f64>,
    #[serde(rename = "pChange", default)]
    pub p_change: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IndexSnapshotResponse {
    #[serde(default)]
    data: Vec<IndexConstituent>,
}

/// Client for NSE listing archives and the index snapshot API.
///
/// The snapshot API refuses requests without browser-like headers and a
/// session cookie obtained from the homepage, so the client keeps a cookie
/// jar and primes it lazily.
#[derive(Clone)]
pub struct NseClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl NseClient {
    pub fn new() -> Result<Self, ScreenerError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_static(SITE_BASE_URL),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json, text/plain, */*"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(10, Duration::from_secs(60)),
        })
    }

    /// Download a board's listing file and parse symbol + company name.
    pub async fn fetch_listings(&self, board: Board) -> Result<Vec<ListedCompany>, ScreenerError> {
        let url = format!("{}{}", ARCHIVES_BASE_URL, board.listing_path());
        tracing::info!("Downloading NSE listings: {}", url);

        self.rate_limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScreenerError::Api(format!(
                "HTTP {} fetching {}",
                response.status(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        let companies = parse_listing_csv(&body, board.series_filter())?;
        tracing::info!("Parsed {} listed companies", companies.len());
        Ok(companies)
    }

    /// Fetch constituents of a named index (for example "NIFTY 50").
    ///
    /// The index's own summary row is dropped from the result.
    pub async fn index_snapshot(
        &self,
        index_name: &str,
    ) -> Result<Vec<IndexConstituent>, ScreenerError> {
        self.prime_session().await?;

        let url = format!(
            "{}/api/equity-stockIndices?index={}",
            SITE_BASE_URL,
            url_encode(index_name)
        );

        self.rate_limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScreenerError::Api(format!(
                "HTTP {} fetching index {}",
                response.status(),
                index_name
            )));
        }

        let snapshot: IndexSnapshotResponse = response
            .json()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        let upper = index_name.to_uppercase();
        Ok(snapshot
            .data
            .into_iter()
            .filter(|row| row.symbol.to_uppercase() != upper)
            .collect())
    }

    /// Visit the homepage so the cookie jar holds a valid session.
    async fn prime_session(&self) -> Result<(), ScreenerError> {
        self.rate_limiter.acquire().await;
        self.client
            .get(SITE_BASE_URL)
            .send()
            .await
            .map_err(|e| ScreenerError::Api(format!("session init failed: {e}")))?;
        Ok(())
    }
}

fn parse_listing_csv(
    body: &str,
    series_filter: Option<&str>,
) -> Result<Vec<ListedCompany>, ScreenerError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ScreenerError::Schema(e.to_string()))?
        .clone();

    let find_column = |name: &str| -> Result<usize, ScreenerError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| ScreenerError::Schema(format!("listing file missing column '{name}'")))
    };

    let symbol_idx = find_column("SYMBOL")?;
    let name_idx = find_column("NAME OF COMPANY")?;
    let series_idx = match series_filter {
        Some(_) => Some(find_column("SERIES")?),
        None => None,
    };

    let mut companies = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ScreenerError::Schema(e.to_string()))?;

        if let (Some(filter), Some(idx)) = (series_filter, series_idx) {
            if record.get(idx).map(str::trim) != Some(filter) {
                continue;
            }
        }

        let symbol = record.get(symbol_idx).unwrap_or("").trim().to_uppercase();
        let name = record.get(name_idx).unwrap_or("").trim().to_string();
        if symbol.is_empty() || name.is_empty() {
            continue;
        }

        companies.push(ListedCompany { symbol, name });
    }

    companies.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(companies)
}

fn url_encode(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            c => c.to_string(),
        })
        .collect()
}
