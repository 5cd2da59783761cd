//! Analyze the NIFTY 50 trend and send the summary to Telegram.

use market_data::YahooClient;
use notification_service::{NotificationChannel, TelegramConfig, TelegramNotifier};
use report_gen::format_index_trend;
use technical_analysis::{analyze_index_trend, IndicatorConfig};

const INDEX_TICKER: &str = "^NSEI";
const INDEX_NAME: &str = "NIFTY 50";
const HISTORY_RANGE: &str = "6mo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "index_trend=info,market_data=info".into()),
        )
        .init();

    let yahoo = YahooClient::new()?;

    tracing::info!("Fetching {} history", INDEX_NAME);
    let bars = yahoo.index_bars(INDEX_TICKER, HISTORY_RANGE).await?;
    if bars.is_empty() {
        anyhow::bail!("no index history returned for {INDEX_TICKER}");
    }

    let as_of = bars.last().map(|b| b.date).unwrap_or_default();
    let trend = analyze_index_trend(&bars, &IndicatorConfig::default())?;
    let message = format_index_trend(INDEX_NAME, as_of, &trend);

    tracing::info!(
        "{}: {} ({}/{} checks)",
        INDEX_NAME,
        trend.label.to_label(),
        trend.bullish_count,
        trend.checks.len()
    );

    match TelegramNotifier::from_config(&TelegramConfig::from_env()) {
        Some(notifier) => {
            if let Err(e) = notifier.send(&message).await {
                tracing::warn!("Trend message delivery failed: {}", e);
            }
        }
        None => println!("{message}"),
    }

    Ok(())
}
