//! Save a dated constituent snapshot for each tracked NSE index.

use market_data::{IndexConstituent, NseClient};
use screener_pipeline::PipelineConfig;
use std::path::Path;

const INDEXES: &[&str] = &["NIFTY 50", "NIFTY BANK"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapshot_indices=info,market_data=info".into()),
        )
        .init();

    let config = PipelineConfig::from_env();
    let nse = NseClient::new()?;
    let today = chrono::Utc::now().date_naive();

    for index in INDEXES {
        match nse.index_snapshot(index).await {
            Ok(rows) if rows.is_empty() => tracing::warn!("No data for {}", index),
            Ok(rows) => {
                let file_name = format!(
                    "{}_{}.csv",
                    index.to_lowercase().replace(' ', "_"),
                    today.format("%Y-%m-%d")
                );
                let path = config.index_snapshot_dir().join(file_name);
                save_snapshot(&path, &rows)?;
                tracing::info!("Saved {} rows to {}", rows.len(), path.display());
            }
            Err(e) => tracing::warn!("Snapshot failed for {}: {}", index, e),
        }
    }

    Ok(())
}

fn save_snapshot(path: &Path, rows: &[IndexConstituent]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["symbol", "open", "day_high", "day_low", "last_price", "p_change"])?;
    for row in rows {
        writer.write_record([
            row.symbol.clone(),
            fmt(row.open),
            fmt(row.day_high),
            fmt(row.day_low),
            fmt(row.last_price),
            fmt(row.p_change),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn fmt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
