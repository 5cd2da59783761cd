use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for one trading session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Supertrend direction for a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
        }
    }
}

/// A price bar augmented with derived indicator values.
///
/// Every indicator field is `None` until its warm-up window has been
/// observed; consumers must treat `None` as "unavailable", never as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub atr_14: Option<f64>,
    pub adx_14: Option<f64>,
    pub supertrend_direction: Option<TrendDirection>,
    pub supertrend_upper: Option<f64>,
    pub supertrend_lower: Option<f64>,
}

impl IndicatorRow {
    /// A row with no indicator values yet, carrying the bar through.
    pub fn from_bar(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            symbol: bar.symbol.clone(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            rsi_14: None,
            macd: None,
            macd_signal: None,
            bb_upper: None,
            bb_lower: None,
            atr_14: None,
            adx_14: None,
            supertrend_direction: None,
            supertrend_upper: None,
            supertrend_lower: None,
        }
    }
}

/// Company fundamentals, one row per symbol, replaced wholesale on refetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    /// Market capitalization in rupees.
    pub market_cap: Option<f64>,
    pub pe: Option<f64>,
    pub book_value: Option<f64>,
    /// Return on equity as a fraction (0.18 = 18%).
    pub roe: Option<f64>,
    /// Return on capital employed as a fraction.
    pub roce: Option<f64>,
    /// Total debt in rupees.
    pub debt: Option<f64>,
}

/// Screening signal derived from the unit-score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    StrongBuy,
    Buy,
    Watchlist,
    Neutral,
    MildBearish,
    Sell,
    StrongSell,
}

impl Signal {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 3 => Signal::StrongBuy,
            2 => Signal::Buy,
            1 => Signal::Watchlist,
            0 => Signal::Neutral,
            -1 => Signal::MildBearish,
            -2 => Signal::Sell,
            _ => Signal::StrongSell,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "Strong Buy",
            Signal::Buy => "Buy",
            Signal::Watchlist => "Watchlist",
            Signal::Neutral => "Neutral",
            Signal::MildBearish => "Mild Bearish",
            Signal::Sell => "Sell",
            Signal::StrongSell => "Strong Sell",
        }
    }
}

/// Scoring outcome for one symbol's latest indicator row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub signal: Signal,
    /// Raw sum of per-indicator unit contributions.
    pub score: i32,
    /// Percent agreement of the scored indicators, 0-100.
    pub confidence: u8,
    pub reasons: Vec<String>,
}

/// Market capitalization band on NSE convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketCapBand {
    LargeCap,
    MidCap,
    SmallCap,
}

const LARGE_CAP_FLOOR: f64 = 2_000_000_000_000.0; // 2 lakh crore
const MID_CAP_FLOOR: f64 = 500_000_000_000.0; // 50,000 crore

impl MarketCapBand {
    /// Classify from market capitalization in rupees.
    pub fn from_market_cap(market_cap: f64) -> Self {
        if market_cap >= LARGE_CAP_FLOOR {
            MarketCapBand::LargeCap
        } else if market_cap >= MID_CAP_FLOOR {
            MarketCapBand::MidCap
        } else {
            MarketCapBand::SmallCap
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            MarketCapBand::LargeCap => "Large Cap",
            MarketCapBand::MidCap => "Mid Cap",
            MarketCapBand::SmallCap => "Small Cap",
        }
    }
}
