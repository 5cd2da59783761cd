use screener_core::{IndicatorRow, PriceBar, ScreenerError};
use serde::{Deserialize, Serialize};

use crate::indicators::{adx, atr, bollinger_bands, macd, rsi, supertrend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Bollinger,
    Atr,
    Adx,
    Supertrend,
}

/// Which indicators to compute, and with what parameters.
///
/// One configuration object replaces the per-call-site parameter soup the
/// pipeline previously needed; disable an indicator by leaving it out of
/// `enabled` and its columns stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub enabled: Vec<IndicatorKind>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub atr_period: usize,
    pub adx_period: usize,
    pub supertrend_period: usize,
    pub supertrend_multiplier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                IndicatorKind::Rsi,
                IndicatorKind::Macd,
                IndicatorKind::Bollinger,
                IndicatorKind::Atr,
                IndicatorKind::Adx,
                IndicatorKind::Supertrend,
            ],
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
            atr_period: 14,
            adx_period: 14,
            supertrend_period: 10,
            supertrend_multiplier: 3.0,
        }
    }
}

impl IndicatorConfig {
    pub fn is_enabled(&self, kind: IndicatorKind) -> bool {
        self.enabled.contains(&kind)
    }
}

/// Compute every enabled indicator over `bars`, producing one row per bar.
///
/// Rows inside an indicator's warm-up window carry `None` for that
/// indicator; a series shorter than the warm-up yields an all-`None` column,
/// not an error. Input must be non-empty, strictly ascending by date, and
/// numerically finite.
pub fn compute_indicators(
    bars: &[PriceBar],
    config: &IndicatorConfig,
) -> Result<Vec<IndicatorRow>, ScreenerError> {
    validate_bars(bars)?;

    let n = bars.len();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut rows: Vec<IndicatorRow> = bars.iter().map(IndicatorRow::from_bar).collect();

    if config.is_enabled(IndicatorKind::Rsi) {
        let values = rsi(&closes, config.rsi_period);
        let offset = n - values.len();
        for (j, &v) in values.iter().enumerate() {
            rows[offset + j].rsi_14 = Some(v);
        }
    }

    if config.is_enabled(IndicatorKind::Macd) {
        let series = macd(
            &closes,
            config.macd_fast,
            config.macd_slow,
            config.macd_signal,
        );
        let macd_offset = n - series.macd.len();
        for (j, &v) in series.macd.iter().enumerate() {
            rows[macd_offset + j].macd = Some(v);
        }
        let signal_offset = n - series.signal.len();
        for (j, &v) in series.signal.iter().enumerate() {
            rows[signal_offset + j].macd_signal = Some(v);
        }
    }

    if config.is_enabled(IndicatorKind::Bollinger) {
        let bands = bollinger_bands(&closes, config.bb_period, config.bb_std_dev);
        let offset = n - bands.upper.len();
        for j in 0..bands.upper.len() {
            rows[offset + j].bb_upper = Some(bands.upper[j]);
            rows[offset + j].bb_lower = Some(bands.lower[j]);
        }
    }

    if config.is_enabled(IndicatorKind::Atr) {
        let values = atr(bars, config.atr_period);
        let offset = n - values.len();
        for (j, &v) in values.iter().enumerate() {
            rows[offset + j].atr_14 = Some(v);
        }
    }

    if config.is_enabled(IndicatorKind::Adx) {
        let series = adx(bars, config.adx_period);
        let offset = n - series.adx.len();
        for (j, &v) in series.adx.iter().enumerate() {
            rows[offset + j].adx_14 = Some(v);
        }
    }

    if config.is_enabled(IndicatorKind::Supertrend) {
        let series = supertrend(
            bars,
            config.supertrend_period,
            config.supertrend_multiplier,
        );
        let offset = n - series.direction.len();
        for j in 0..series.direction.len() {
            rows[offset + j].supertrend_direction = Some(series.direction[j]);
            rows[offset + j].supertrend_upper = Some(series.upper[j]);
            rows[offset + j].supertrend_lower = Some(series.lower[j]);
        }
    }

    Ok(rows)
}

fn validate_bars(bars: &[PriceBar]) -> Result<(), ScreenerError> {
    if bars.is_empty() {
        return Err(ScreenerError::InvalidData("no price bars".to_string()));
    }

    for bar in bars {
        let finite = bar.open.is_finite()
            && bar.high.is_finite()
            && bar.low.is_finite()
            && bar.close.is_finite()
            && bar.volume.is_finite();
        if !finite {
            return Err(ScreenerError::InvalidData(format!(
                "non-finite price field for {} on {}",
                bar.symbol, bar.date
            )));
        }
    }

    for w in bars.windows(2) {
        if w[1].date <= w[0].date {
            return Err(ScreenerError::InvalidData(format!(
                "bars not strictly ascending by date at {}",
                w[1].date
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, open: f64, high: f64, low: f64, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(u64::from(day)))
            .unwrap();
        PriceBar {
            date,
            symbol: "TEST".to_string(),
            open,
            high,
            low,
            close,
            volume: 100_000.0,
        }
    }

    fn trending_bars(n: u32) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                bar(i, base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect()
    }

    #[test]
    fn short_series_yields_all_none_columns() {
        let bars = trending_bars(10);
        let rows = compute_indicators(&bars, &IndicatorConfig::default()).unwrap();

        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.rsi_14.is_none()));
        assert!(rows.iter().all(|r| r.macd.is_none()));
        assert!(rows.iter().all(|r| r.bb_upper.is_none()));
        assert!(rows.iter().all(|r| r.atr_14.is_none()));
        assert!(rows.iter().all(|r| r.adx_14.is_none()));
        assert!(rows.iter().all(|r| r.supertrend_direction.is_none()));
    }

    #[test]
    fn warm_up_boundaries() {
        let bars = trending_bars(60);
        let config = IndicatorConfig::default();
        let rows = compute_indicators(&bars, &config).unwrap();

        // RSI(14): first defined at index 14
        assert!(rows[13].rsi_14.is_none());
        assert!(rows[14].rsi_14.is_some());

        // MACD(12,26,9): line at 25, signal at 33
        assert!(rows[24].macd.is_none());
        assert!(rows[25].macd.is_some());
        assert!(rows[32].macd_signal.is_none());
        assert!(rows[33].macd_signal.is_some());

        // Bollinger(20): index 19
        assert!(rows[18].bb_upper.is_none());
        assert!(rows[19].bb_upper.is_some());

        // ATR(14): index 14
        assert!(rows[13].atr_14.is_none());
        assert!(rows[14].atr_14.is_some());

        // ADX(14): index 27
        assert!(rows[26].adx_14.is_none());
        assert!(rows[27].adx_14.is_some());

        // Supertrend(10): index 10
        assert!(rows[9].supertrend_direction.is_none());
        assert!(rows[10].supertrend_direction.is_some());
        assert!(rows[10].supertrend_upper.is_some());
        assert!(rows[10].supertrend_lower.is_some());
    }

    #[test]
    fn disabled_indicator_stays_none() {
        let bars = trending_bars(60);
        let config = IndicatorConfig {
            enabled: vec![IndicatorKind::Rsi],
            ..IndicatorConfig::default()
        };
        let rows = compute_indicators(&bars, &config).unwrap();

        assert!(rows[30].rsi_14.is_some());
        assert!(rows.iter().all(|r| r.macd.is_none()));
        assert!(rows.iter().all(|r| r.adx_14.is_none()));
    }

    #[test]
    fn rsi_bounded_when_defined() {
        let bars = trending_bars(80);
        let rows = compute_indicators(&bars, &IndicatorConfig::default()).unwrap();

        for row in &rows {
            if let Some(v) = row.rsi_14 {
                assert!((0.0..=100.0).contains(&v), "rsi out of range: {v}");
            }
        }
    }

    #[test]
    fn empty_input_is_invalid_data() {
        let err = compute_indicators(&[], &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(err, ScreenerError::InvalidData(_)));
    }

    #[test]
    fn unsorted_dates_rejected() {
        let mut bars = trending_bars(20);
        bars.swap(3, 4);
        let err = compute_indicators(&bars, &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(err, ScreenerError::InvalidData(_)));
    }

    #[test]
    fn duplicate_dates_rejected() {
        let mut bars = trending_bars(20);
        bars[5].date = bars[4].date;
        let err = compute_indicators(&bars, &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(err, ScreenerError::InvalidData(_)));
    }

    #[test]
    fn non_finite_close_rejected() {
        let mut bars = trending_bars(20);
        bars[7].close = f64::NAN;
        let err = compute_indicators(&bars, &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(err, ScreenerError::InvalidData(_)));
    }

    #[test]
    fn supertrend_direction_stable_between_bands() {
        let bars = trending_bars(40);
        let config = IndicatorConfig::default();
        let rows = compute_indicators(&bars, &config).unwrap();

        for pair in rows.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            let (Some(prev_dir), Some(cur_dir)) =
                (prev.supertrend_direction, cur.supertrend_direction)
            else {
                continue;
            };
            let (Some(upper), Some(lower)) = (prev.supertrend_upper, prev.supertrend_lower)
            else {
                continue;
            };
            if cur.close > lower && cur.close < upper {
                assert_eq!(prev_dir, cur_dir, "direction flipped inside bands");
            }
        }
    }

    #[test]
    fn supertrend_uptrend_on_rising_prices() {
        let bars = trending_bars(40);
        let rows = compute_indicators(&bars, &IndicatorConfig::default()).unwrap();
        let last = rows.last().unwrap();
        assert_eq!(
            last.supertrend_direction,
            Some(screener_core::TrendDirection::Up)
        );
    }
}
