//! Text report rendering. Formatting never fails: any missing numeric or
//! text field renders as the literal `N/A`.

use chrono::NaiveDate;
use screener_core::{CompanyInfo, IndicatorRow, MarketCapBand, TrendDirection, Verdict};
use technical_analysis::IndexTrend;

const LAKH: f64 = 1e5;
const CRORE: f64 = 1e7;
const LAKH_CRORE: f64 = 1e12;

/// Format a rupee amount with Indian numbering suffixes.
pub fn format_inr(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "N/A".to_string();
    };

    if v >= LAKH_CRORE {
        format!("\u{20B9}{:.2} L Cr", v / LAKH_CRORE)
    } else if v >= CRORE {
        format!("\u{20B9}{:.2} Cr", v / CRORE)
    } else if v >= LAKH {
        format!("\u{20B9}{:.2} Lakh", v / LAKH)
    } else {
        format!("\u{20B9}{v:.2}")
    }
}

/// Format a fractional ratio (0.42 = 42%) as a percentage.
pub fn format_percentage(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

fn format_num(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

fn format_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn format_direction(direction: Option<TrendDirection>) -> &'static str {
    match direction {
        Some(TrendDirection::Up) => "Up",
        Some(TrendDirection::Down) => "Down",
        None => "N/A",
    }
}

fn format_score(score: i32) -> String {
    if score > 0 {
        format!("+{score}")
    } else {
        score.to_string()
    }
}

/// Render the full per-symbol report: company metadata, technical snapshot,
/// verdict with supporting reasons.
pub fn format_report(company: &CompanyInfo, latest: &IndicatorRow, verdict: &Verdict) -> String {
    let market_cap_line = match company.market_cap {
        Some(cap) => format!(
            "{} ({})",
            format_inr(Some(cap)),
            MarketCapBand::from_market_cap(cap).to_label()
        ),
        None => "N/A".to_string(),
    };

    let mut report = format!(
        "Stock Report: {symbol}\n\
         \n\
         Company Name:        {name}\n\
         Sector:              {sector}\n\
         Industry:            {industry}\n\
         Market Cap:          {market_cap}\n\
         P/E Ratio:           {pe}\n\
         Book Value:          {book_value}\n\
         ROE:                 {roe}\n\
         ROCE:                {roce}\n\
         Total Debt:          {debt}\n\
         \n\
         Technical Snapshot ({date})\n\
         Close:               {close}\n\
         RSI(14):             {rsi}\n\
         MACD:                {macd} (signal {macd_signal})\n\
         Bollinger Bands:     {bb_lower} - {bb_upper}\n\
         ATR(14):             {atr}\n\
         ADX(14):             {adx}\n\
         Supertrend:          {supertrend}\n\
         \n\
         Verdict: {signal} (score {score}, confidence {confidence}%)\n",
        symbol = latest.symbol,
        name = format_text(&company.company_name),
        sector = format_text(&company.sector),
        industry = format_text(&company.industry),
        market_cap = market_cap_line,
        pe = format_num(company.pe),
        book_value = format_num(company.book_value),
        roe = format_percentage(company.roe),
        roce = format_percentage(company.roce),
        debt = format_inr(company.debt),
        date = latest.date.format("%Y-%m-%d"),
        close = format_num(Some(latest.close)),
        rsi = format_num(latest.rsi_14),
        macd = format_num(latest.macd),
        macd_signal = format_num(latest.macd_signal),
        bb_lower = format_num(latest.bb_lower),
        bb_upper = format_num(latest.bb_upper),
        atr = format_num(latest.atr_14),
        adx = format_num(latest.adx_14),
        supertrend = format_direction(latest.supertrend_direction),
        signal = verdict.signal.to_label(),
        score = format_score(verdict.score),
        confidence = verdict.confidence,
    );

    for reason in &verdict.reasons {
        report.push_str("- ");
        report.push_str(reason);
        report.push('\n');
    }

    report.push_str("\nSource: Yahoo Finance");
    report
}

/// Render the broad-index trend message.
pub fn format_index_trend(index_name: &str, as_of: NaiveDate, trend: &IndexTrend) -> String {
    let mut message = format!(
        "{} Trend Analysis ({})\n\
         \n\
         Trend: {} ({}/{} signals positive)\n\
         \n",
        index_name,
        as_of.format("%d-%b-%Y"),
        trend.label.to_label(),
        trend.bullish_count,
        trend.checks.len(),
    );

    for check in &trend.checks {
        let mark = if check.passed { '+' } else { '-' };
        message.push_str(&format!("{mark} {}\n", check.name));
    }

    message
}
