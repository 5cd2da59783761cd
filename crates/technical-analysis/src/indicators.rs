use screener_core::{PriceBar, TrendDirection};

/// Simple Moving Average. First output corresponds to input index `period - 1`.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Exponential Moving Average seeded with the SMA of the first `period`
/// values. First output corresponds to input index `period - 1`.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len() - period + 1);
    let mut prev: f64 = data[..period].iter().sum::<f64>() / period as f64;
    result.push(prev);

    for &value in &data[period..] {
        prev = (value - prev) * multiplier + prev;
        result.push(prev);
    }

    result
}

/// Wilder's Relative Strength Index, bounded [0, 100]. First output
/// corresponds to input index `period`.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);

    for w in data.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut rsi_values = Vec::with_capacity(data.len() - period);
    rsi_values.push(rsi_point(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        rsi_values.push(rsi_point(avg_gain, avg_loss));
    }

    rsi_values
}

fn rsi_point(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - (100.0 / (1.0 + rs))
}

/// MACD line plus its signal line.
pub struct MacdSeries {
    /// First value corresponds to input index `slow - 1`.
    pub macd: Vec<f64>,
    /// First value corresponds to input index `slow + signal_period - 2`.
    pub signal: Vec<f64>,
}

pub fn macd(data: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_period == 0 || slow <= fast || data.len() < slow {
        return MacdSeries {
            macd: vec![],
            signal: vec![],
        };
    }

    let ema_fast = ema(data, fast);
    let ema_slow = ema(data, slow);

    let shift = slow - fast;
    let macd_line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, slow_val)| ema_fast[i + shift] - slow_val)
        .collect();

    let signal = ema(&macd_line, signal_period);

    MacdSeries {
        macd: macd_line,
        signal,
    }
}

/// Bollinger Bands. First output corresponds to input index `period - 1`.
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerSeries {
    if period == 0 || data.len() < period {
        return BollingerSeries {
            upper: vec![],
            middle: vec![],
            lower: vec![],
        };
    }

    let middle = sma(data, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for i in period - 1..data.len() {
        let slice = &data[i + 1 - period..=i];
        let mean = middle[i + 1 - period];
        let variance: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();

        upper.push(mean + std_dev * std);
        lower.push(mean - std_dev * std);
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}

/// True range per bar, defined from index 1 (needs the prior close).
pub fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            let high_low = w[1].high - w[1].low;
            let high_close = (w[1].high - w[0].close).abs();
            let low_close = (w[1].low - w[0].close).abs();
            high_low.max(high_close).max(low_close)
        })
        .collect()
}

/// Average True Range as a simple rolling mean of true range. First output
/// corresponds to input index `period`.
pub fn atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period + 1 {
        return vec![];
    }
    sma(&true_ranges(bars), period)
}

/// Wilder's directional movement index.
pub struct AdxSeries {
    /// First value corresponds to input index `2 * period - 1`.
    pub adx: Vec<f64>,
    /// First value corresponds to input index `period`.
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

pub fn adx(bars: &[PriceBar], period: usize) -> AdxSeries {
    if period == 0 || bars.len() < period + 1 {
        return AdxSeries {
            adx: vec![],
            plus_di: vec![],
            minus_di: vec![],
        };
    }

    let mut plus_dm = Vec::with_capacity(bars.len() - 1);
    let mut minus_dm = Vec::with_capacity(bars.len() - 1);
    let true_range = true_ranges(bars);

    for w in bars.windows(2) {
        let up_move = w[1].high - w[0].high;
        let down_move = w[0].low - w[1].low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    // Wilder smoothing, seeded with plain sums over the first window
    let mut smoothed_plus_dm: f64 = plus_dm[..period].iter().sum();
    let mut smoothed_minus_dm: f64 = minus_dm[..period].iter().sum();
    let mut smoothed_tr: f64 = true_range[..period].iter().sum();

    let mut plus_di = Vec::new();
    let mut minus_di = Vec::new();
    let mut dx_values = Vec::new();

    let mut push_point = |sp: f64, sm: f64, st: f64| {
        let pdi = if st > 0.0 { 100.0 * sp / st } else { 0.0 };
        let mdi = if st > 0.0 { 100.0 * sm / st } else { 0.0 };
        plus_di.push(pdi);
        minus_di.push(mdi);

        let di_sum = pdi + mdi;
        dx_values.push(if di_sum > 0.0 {
            100.0 * (pdi - mdi).abs() / di_sum
        } else {
            0.0
        });
    };

    push_point(smoothed_plus_dm, smoothed_minus_dm, smoothed_tr);

    for i in period..plus_dm.len() {
        smoothed_plus_dm = smoothed_plus_dm - smoothed_plus_dm / period as f64 + plus_dm[i];
        smoothed_minus_dm = smoothed_minus_dm - smoothed_minus_dm / period as f64 + minus_dm[i];
        smoothed_tr = smoothed_tr - smoothed_tr / period as f64 + true_range[i];
        push_point(smoothed_plus_dm, smoothed_minus_dm, smoothed_tr);
    }

    if dx_values.len() < period {
        return AdxSeries {
            adx: vec![],
            plus_di,
            minus_di,
        };
    }

    let mut adx_values = Vec::with_capacity(dx_values.len() - period + 1);
    let mut adx_val = dx_values[..period].iter().sum::<f64>() / period as f64;
    adx_values.push(adx_val);

    for dx in &dx_values[period..] {
        adx_val = (adx_val * (period - 1) as f64 + dx) / period as f64;
        adx_values.push(adx_val);
    }

    AdxSeries {
        adx: adx_values,
        plus_di,
        minus_di,
    }
}

/// Sticky-band Supertrend. First output corresponds to input index `period`.
pub struct SupertrendSeries {
    pub direction: Vec<TrendDirection>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// The band on the active trend's side only moves in the trend-confirming
/// direction while the trend holds; a flip resets both bands to their basic
/// values. Flips compare close against the prior final (possibly carried)
/// bands. The seed direction is up.
pub fn supertrend(bars: &[PriceBar], period: usize, multiplier: f64) -> SupertrendSeries {
    let atr_values = atr(bars, period);
    if atr_values.is_empty() {
        return SupertrendSeries {
            direction: vec![],
            upper: vec![],
            lower: vec![],
        };
    }

    let offset = bars.len() - atr_values.len();
    let mut direction = Vec::with_capacity(atr_values.len());
    let mut upper = Vec::with_capacity(atr_values.len());
    let mut lower = Vec::with_capacity(atr_values.len());

    let mut prev_dir = TrendDirection::Up;
    let mut prev_upper = f64::NAN;
    let mut prev_lower = f64::NAN;

    for (j, &atr_val) in atr_values.iter().enumerate() {
        let bar = &bars[offset + j];
        let hl2 = (bar.high + bar.low) / 2.0;
        let basic_upper = hl2 + multiplier * atr_val;
        let basic_lower = hl2 - multiplier * atr_val;

        let (dir, final_upper, final_lower) = if j == 0 {
            (TrendDirection::Up, basic_upper, basic_lower)
        } else if bar.close > prev_upper {
            (TrendDirection::Up, basic_upper, basic_lower)
        } else if bar.close < prev_lower {
            (TrendDirection::Down, basic_upper, basic_lower)
        } else {
            let mut fu = basic_upper;
            let mut fl = basic_lower;
            match prev_dir {
                TrendDirection::Up => {
                    if fl < prev_lower {
                        fl = prev_lower;
                    }
                }
                TrendDirection::Down => {
                    if fu > prev_upper {
                        fu = prev_upper;
                    }
                }
            }
            (prev_dir, fu, fl)
        };

        direction.push(dir);
        upper.push(final_upper);
        lower.push(final_lower);

        prev_dir = dir;
        prev_upper = final_upper;
        prev_lower = final_lower;
    }

    SupertrendSeries {
        direction,
        upper,
        lower,
    }
}
