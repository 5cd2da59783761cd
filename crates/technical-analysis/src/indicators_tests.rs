#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use chrono::NaiveDate;
    use screener_core::{PriceBar, TrendDirection};

    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    fn make_bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<PriceBar> {
        ohlc.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                symbol: "TEST".to_string(),
                open,
                high,
                low,
                close,
                volume: 1_000_000.0,
            })
            .collect()
    }

    fn sample_bars() -> Vec<PriceBar> {
        let ohlc: Vec<(f64, f64, f64, f64)> = (0..15)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect();
        make_bars(&ohlc)
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 0.001);
        assert!((result[1] - 3.0).abs() < 0.001);
        assert!((result[2] - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        assert!(sma(&data, 5).is_empty());
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), 3);
        let first_sma = (22.0 + 24.0 + 23.0) / 3.0;
        assert!((result[0] - first_sma).abs() < 0.01);
    }

    #[test]
    fn test_ema_insufficient_data() {
        let data = vec![1.0, 2.0];
        assert!(ema(&data, 5).is_empty());
    }

    #[test]
    fn test_ema_rises_in_uptrend() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let result = ema(&data, 3);

        for pair in result.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_rsi_bounded() {
        let result = rsi(&sample_prices(), 14);

        assert_eq!(result.len(), sample_prices().len() - 14);
        for &value in &result {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        assert!(rsi(&data, 14).is_empty());
    }

    #[test]
    fn test_rsi_overbought_in_uptrend() {
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + f64::from(i)).collect();
        let result = rsi(&uptrend, 14);
        assert!(*result.last().unwrap() > 70.0);
    }

    #[test]
    fn test_rsi_oversold_in_downtrend() {
        let downtrend: Vec<f64> = (0..20).map(|i| 100.0 - f64::from(i)).collect();
        let result = rsi(&downtrend, 14);
        assert!(*result.last().unwrap() < 30.0);
    }

    #[test]
    fn test_macd_alignment() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let result = macd(&prices, 12, 26, 9);

        assert_eq!(result.macd.len(), prices.len() - 25);
        assert_eq!(result.signal.len(), result.macd.len() - 8);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let result = macd(&sample_prices(), 12, 26, 9);
        assert!(result.macd.is_empty());
        assert!(result.signal.is_empty());
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let uptrend: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
        let result = macd(&uptrend, 12, 26, 9);
        assert!(*result.macd.last().unwrap() > 0.0);
    }

    #[test]
    fn test_bollinger_bands_ordering() {
        let result = bollinger_bands(&sample_prices(), 10, 2.0);

        assert_eq!(result.upper.len(), result.middle.len());
        assert_eq!(result.middle.len(), result.lower.len());
        for i in 0..result.upper.len() {
            assert!(result.upper[i] > result.middle[i]);
            assert!(result.middle[i] > result.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_bands_narrow_on_flat_prices() {
        let prices = vec![100.0; 20];
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 0..result.upper.len() {
            assert!(result.upper[i] - result.lower[i] < 1e-9);
        }
    }

    #[test]
    fn test_true_ranges_gap_up() {
        let bars = make_bars(&[(100.0, 101.0, 99.0, 100.0), (105.0, 106.0, 104.0, 105.0)]);
        let tr = true_ranges(&bars);

        assert_eq!(tr.len(), 1);
        // gap from prior close dominates the session range
        assert!((tr[0] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_atr_positive_and_aligned() {
        let bars = sample_bars();
        let result = atr(&bars, 5);

        assert_eq!(result.len(), bars.len() - 5);
        for &value in &result {
            assert!(value > 0.0);
        }
    }

    #[test]
    fn test_atr_insufficient_data() {
        let bars = sample_bars()[..5].to_vec();
        assert!(atr(&bars, 14).is_empty());
    }

    #[test]
    fn test_atr_scales_with_volatility() {
        let calm = sample_bars();
        let mut wild = sample_bars();
        for bar in &mut wild {
            bar.high += 10.0;
            bar.low -= 10.0;
        }

        let calm_atr = atr(&calm, 5);
        let wild_atr = atr(&wild, 5);
        assert!(wild_atr[0] > calm_atr[0]);
    }

    #[test]
    fn test_adx_alignment() {
        let ohlc: Vec<(f64, f64, f64, f64)> = (0..40)
            .map(|i| {
                let base = 100.0 + 1.5 * i as f64;
                (base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect();
        let bars = make_bars(&ohlc);
        let result = adx(&bars, 14);

        assert_eq!(result.plus_di.len(), bars.len() - 14);
        assert_eq!(result.adx.len(), bars.len() - 27);
    }

    #[test]
    fn test_adx_strong_in_steady_trend() {
        let ohlc: Vec<(f64, f64, f64, f64)> = (0..60)
            .map(|i| {
                let base = 100.0 + 2.0 * i as f64;
                (base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect();
        let bars = make_bars(&ohlc);
        let result = adx(&bars, 14);

        assert!(*result.adx.last().unwrap() > 40.0);
        assert!(result.plus_di.last().unwrap() > result.minus_di.last().unwrap());
    }

    #[test]
    fn test_adx_insufficient_data() {
        let bars = sample_bars()[..6].to_vec();
        let result = adx(&bars, 14);
        assert!(result.adx.is_empty());
        assert!(result.plus_di.is_empty());
    }

    #[test]
    fn test_supertrend_alignment_and_seed() {
        let bars = sample_bars();
        let result = supertrend(&bars, 5, 3.0);

        assert_eq!(result.direction.len(), bars.len() - 5);
        assert_eq!(result.upper.len(), result.direction.len());
        assert_eq!(result.lower.len(), result.direction.len());
        assert_eq!(result.direction[0], TrendDirection::Up);
    }

    #[test]
    fn test_supertrend_flips_down_on_collapse() {
        let mut ohlc: Vec<(f64, f64, f64, f64)> = (0..20)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect();
        // sharp break well below any plausible lower band
        for i in 0..10 {
            let base = 60.0 - 5.0 * i as f64;
            ohlc.push((base, base + 2.0, base - 1.0, base - 0.5));
        }
        let bars = make_bars(&ohlc);
        let result = supertrend(&bars, 5, 3.0);

        assert_eq!(*result.direction.last().unwrap(), TrendDirection::Down);
    }

    #[test]
    fn test_supertrend_lower_band_never_falls_in_uptrend() {
        let ohlc: Vec<(f64, f64, f64, f64)> = (0..30)
            .map(|i| {
                let base = 100.0 + 0.5 * i as f64;
                (base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect();
        let bars = make_bars(&ohlc);
        let result = supertrend(&bars, 5, 3.0);

        for i in 1..result.direction.len() {
            if result.direction[i] == TrendDirection::Up
                && result.direction[i - 1] == TrendDirection::Up
            {
                assert!(result.lower[i] >= result.lower[i - 1]);
            }
        }
    }

    #[test]
    fn test_supertrend_insufficient_data() {
        let bars = sample_bars()[..4].to_vec();
        let result = supertrend(&bars, 10, 3.0);
        assert!(result.direction.is_empty());
    }
}
