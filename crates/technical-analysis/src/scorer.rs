use screener_core::{IndicatorRow, ScreenerError, Signal, TrendDirection, Verdict};

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const ADX_STRONG_TREND: f64 = 40.0;

/// Score a symbol's latest indicator row into a verdict.
///
/// Each indicator with usable inputs contributes exactly one of {+1, -1, 0};
/// an indicator whose inputs are `None` is skipped entirely and does not
/// count toward the confidence denominator. With nothing scorable the result
/// is `InsufficientData`, never a numeric verdict.
pub fn score(latest: &IndicatorRow) -> Result<Verdict, ScreenerError> {
    let mut score: i32 = 0;
    let mut scored: u32 = 0;
    let mut reasons = Vec::new();

    if let Some(rsi) = latest.rsi_14 {
        scored += 1;
        if rsi < RSI_OVERSOLD {
            score += 1;
            reasons.push(format!("RSI {rsi:.1} oversold"));
        } else if rsi > RSI_OVERBOUGHT {
            score -= 1;
            reasons.push(format!("RSI {rsi:.1} overbought"));
        }
    }

    if let (Some(macd), Some(signal)) = (latest.macd, latest.macd_signal) {
        scored += 1;
        if macd > signal {
            score += 1;
            reasons.push(format!("MACD {macd:.2} above signal {signal:.2}"));
        } else if macd < signal {
            score -= 1;
            reasons.push(format!("MACD {macd:.2} below signal {signal:.2}"));
        }
    }

    if let Some(direction) = latest.supertrend_direction {
        scored += 1;
        match direction {
            TrendDirection::Up => {
                score += 1;
                reasons.push("Supertrend uptrend".to_string());
            }
            TrendDirection::Down => {
                score -= 1;
                reasons.push("Supertrend downtrend".to_string());
            }
        }
    }

    if let Some(adx) = latest.adx_14 {
        scored += 1;
        // trend strength only, no bearish counterpart
        if adx > ADX_STRONG_TREND {
            score += 1;
            reasons.push(format!("ADX {adx:.1} strong trend"));
        }
    }

    if let (Some(upper), Some(lower)) = (latest.bb_upper, latest.bb_lower) {
        scored += 1;
        if latest.close < lower {
            score += 1;
            reasons.push(format!(
                "Close {:.2} below lower band {lower:.2}",
                latest.close
            ));
        } else if latest.close > upper {
            score -= 1;
            reasons.push(format!(
                "Close {:.2} above upper band {upper:.2}",
                latest.close
            ));
        }
    }

    if scored == 0 {
        return Err(ScreenerError::InsufficientData(format!(
            "no scorable indicators for {} on {}",
            latest.symbol, latest.date
        )));
    }

    let confidence = (f64::from(score.unsigned_abs()) / f64::from(scored) * 100.0).round() as u8;

    Ok(Verdict {
        signal: Signal::from_score(score),
        score,
        confidence,
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use screener_core::PriceBar;

    fn row_with(close: f64) -> IndicatorRow {
        IndicatorRow::from_bar(&PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            symbol: "TEST".to_string(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10_000.0,
        })
    }

    #[test]
    fn all_bullish_is_strong_buy_full_confidence() {
        let mut row = row_with(98.0);
        row.rsi_14 = Some(25.0);
        row.macd = Some(1.2);
        row.macd_signal = Some(0.8);
        row.supertrend_direction = Some(TrendDirection::Up);
        row.adx_14 = Some(45.0);
        row.bb_upper = Some(110.0);
        row.bb_lower = Some(100.0);

        let verdict = score(&row).unwrap();
        assert_eq!(verdict.score, 5);
        assert_eq!(verdict.signal, Signal::StrongBuy);
        assert_eq!(verdict.confidence, 100);
        assert_eq!(verdict.reasons.len(), 5);
        // evaluation order: RSI, MACD, Supertrend, ADX, Bollinger
        assert!(verdict.reasons[0].starts_with("RSI"));
        assert!(verdict.reasons[1].starts_with("MACD"));
        assert!(verdict.reasons[2].starts_with("Supertrend"));
        assert!(verdict.reasons[3].starts_with("ADX"));
        assert!(verdict.reasons[4].starts_with("Close"));
    }

    #[test]
    fn score_three_of_four_scored_is_75_confidence() {
        let mut row = row_with(100.0);
        // RSI neutral: scored but contributes 0
        row.rsi_14 = Some(50.0);
        row.macd = Some(1.0);
        row.macd_signal = Some(0.5);
        row.supertrend_direction = Some(TrendDirection::Up);
        row.adx_14 = Some(45.0);
        // Bollinger unavailable: skipped entirely

        let verdict = score(&row).unwrap();
        assert_eq!(verdict.score, 3);
        assert_eq!(verdict.signal, Signal::StrongBuy);
        assert_eq!(verdict.confidence, 75);
    }

    #[test]
    fn null_indicator_skipped_not_zeroed() {
        let mut row = row_with(100.0);
        row.supertrend_direction = Some(TrendDirection::Up);

        let verdict = score(&row).unwrap();
        assert_eq!(verdict.score, 1);
        assert_eq!(verdict.signal, Signal::Watchlist);
        // one of one scored indicators agree
        assert_eq!(verdict.confidence, 100);
    }

    #[test]
    fn zero_score_is_zero_confidence() {
        let mut row = row_with(100.0);
        row.rsi_14 = Some(50.0);
        row.adx_14 = Some(20.0);
        row.macd = Some(1.0);
        row.macd_signal = Some(2.0);
        row.supertrend_direction = Some(TrendDirection::Up);

        let verdict = score(&row).unwrap();
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.signal, Signal::Neutral);
        assert_eq!(verdict.confidence, 0);
        // only the non-zero contributions produce reasons
        assert_eq!(verdict.reasons.len(), 2);
    }

    #[test]
    fn bearish_row_scores_negative() {
        let mut row = row_with(115.0);
        row.rsi_14 = Some(78.0);
        row.macd = Some(-0.5);
        row.macd_signal = Some(0.1);
        row.supertrend_direction = Some(TrendDirection::Down);
        row.adx_14 = Some(50.0);
        row.bb_upper = Some(110.0);
        row.bb_lower = Some(95.0);

        let verdict = score(&row).unwrap();
        // four bearish contributions against ADX's +1
        assert_eq!(verdict.score, -3);
        assert_eq!(verdict.signal, Signal::StrongSell);
        assert_eq!(verdict.confidence, 60);
    }

    #[test]
    fn no_indicators_is_insufficient_data() {
        let row = row_with(100.0);
        let err = score(&row).unwrap_err();
        assert!(matches!(err, ScreenerError::InsufficientData(_)));
    }

    #[test]
    fn macd_without_signal_line_is_skipped() {
        let mut row = row_with(100.0);
        row.macd = Some(2.0);
        row.supertrend_direction = Some(TrendDirection::Down);

        let verdict = score(&row).unwrap();
        assert_eq!(verdict.score, -1);
        assert_eq!(verdict.confidence, 100);
    }
}
