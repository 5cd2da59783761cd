use screener_core::{PriceBar, ScreenerError, TrendDirection};

use crate::engine::{compute_indicators, IndicatorConfig};
use crate::indicators::adx;

const RSI_BULLISH: f64 = 60.0;
const ADX_TRENDING: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl TrendLabel {
    /// Three or more passing checks read as bullish, exactly two as
    /// neutral, fewer as bearish.
    pub fn from_bullish_count(count: usize) -> Self {
        match count {
            n if n >= 3 => TrendLabel::Bullish,
            2 => TrendLabel::Neutral,
            _ => TrendLabel::Bearish,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            TrendLabel::Bullish => "Bullish",
            TrendLabel::Neutral => "Neutral",
            TrendLabel::Bearish => "Bearish",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendCheck {
    pub name: &'static str,
    pub passed: bool,
}

/// Broad-index trend read from four bullish checks on the latest session.
#[derive(Debug, Clone)]
pub struct IndexTrend {
    pub label: TrendLabel,
    pub bullish_count: usize,
    pub checks: Vec<TrendCheck>,
}

/// Evaluate index bars: RSI above 60, MACD above signal, Supertrend up, and
/// ADX above 20 with +DI leading -DI. Three or more passing checks read as
/// bullish, exactly two as neutral, fewer as bearish. A check whose inputs
/// are still in warm-up counts as failed.
pub fn analyze_index_trend(
    bars: &[PriceBar],
    config: &IndicatorConfig,
) -> Result<IndexTrend, ScreenerError> {
    let rows = compute_indicators(bars, config)?;
    let latest = rows
        .last()
        .ok_or_else(|| ScreenerError::InsufficientData("no indicator rows".to_string()))?;

    let rsi_bullish = latest.rsi_14.is_some_and(|v| v > RSI_BULLISH);
    let macd_bullish = matches!(
        (latest.macd, latest.macd_signal),
        (Some(m), Some(s)) if m > s
    );
    let supertrend_bullish = latest.supertrend_direction == Some(TrendDirection::Up);

    let adx_series = adx(bars, config.adx_period);
    let adx_bullish = match (
        adx_series.adx.last(),
        adx_series.plus_di.last(),
        adx_series.minus_di.last(),
    ) {
        (Some(&adx_val), Some(&pdi), Some(&mdi)) => adx_val > ADX_TRENDING && pdi > mdi,
        _ => false,
    };

    let checks = vec![
        TrendCheck {
            name: "RSI",
            passed: rsi_bullish,
        },
        TrendCheck {
            name: "MACD",
            passed: macd_bullish,
        },
        TrendCheck {
            name: "Supertrend",
            passed: supertrend_bullish,
        },
        TrendCheck {
            name: "ADX",
            passed: adx_bullish,
        },
    ];

    let bullish_count = checks.iter().filter(|c| c.passed).count();
    let label = TrendLabel::from_bullish_count(bullish_count);

    Ok(IndexTrend {
        label,
        bullish_count,
        checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars_rising(n: u32) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let base = 1000.0 + 5.0 * f64::from(i);
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .checked_add_days(chrono::Days::new(u64::from(i)))
                        .unwrap(),
                    symbol: "NIFTY".to_string(),
                    open: base,
                    high: base + 8.0,
                    low: base - 4.0,
                    close: base + 5.0,
                    volume: 0.0,
                }
            })
            .collect()
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(TrendLabel::from_bullish_count(4), TrendLabel::Bullish);
        assert_eq!(TrendLabel::from_bullish_count(3), TrendLabel::Bullish);
        assert_eq!(TrendLabel::from_bullish_count(2), TrendLabel::Neutral);
        assert_eq!(TrendLabel::from_bullish_count(1), TrendLabel::Bearish);
        assert_eq!(TrendLabel::from_bullish_count(0), TrendLabel::Bearish);
    }

    #[test]
    fn steady_rise_reads_bullish() {
        let trend = analyze_index_trend(&bars_rising(60), &IndicatorConfig::default()).unwrap();
        assert_eq!(trend.label, TrendLabel::Bullish);
        assert!(trend.bullish_count >= 3);
        assert_eq!(trend.checks.len(), 4);
    }

    #[test]
    fn short_history_reads_bearish_not_error() {
        // every check is still warming up, so all fail
        let trend = analyze_index_trend(&bars_rising(5), &IndicatorConfig::default()).unwrap();
        assert_eq!(trend.label, TrendLabel::Bearish);
        assert_eq!(trend.bullish_count, 0);
    }

    #[test]
    fn falling_index_reads_bearish() {
        let bars: Vec<PriceBar> = (0..60u32)
            .map(|i| {
                let base = 1500.0 - 6.0 * f64::from(i);
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .checked_add_days(chrono::Days::new(u64::from(i)))
                        .unwrap(),
                    symbol: "NIFTY".to_string(),
                    open: base,
                    high: base + 4.0,
                    low: base - 8.0,
                    close: base - 5.0,
                    volume: 0.0,
                }
            })
            .collect();

        let trend = analyze_index_trend(&bars, &IndicatorConfig::default()).unwrap();
        assert_eq!(trend.label, TrendLabel::Bearish);
    }
}
