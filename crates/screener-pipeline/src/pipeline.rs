use notification_service::NotificationChannel;
use report_gen::format_report;
use screener_core::{CompanyInfo, MarketDataSource, ScreenerError};
use snapshot_store::{CompanyStore, IndicatorSnapshot, IndicatorStore};
use technical_analysis::{compute_indicators, score, IndicatorConfig};

use crate::config::PipelineConfig;
use crate::metrics::MetricsCollector;

/// Outcome counters for one screening run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub delivered: usize,
}

enum SymbolOutcome {
    /// Scored and reported (delivery may still have been skipped or failed).
    Processed { delivered: bool },
    /// Nothing usable upstream; the symbol was left alone.
    Skipped,
}

/// The screening pipeline: fetch bars, compute indicators, persist the
/// latest snapshot, refresh company info, score, format, deliver.
///
/// Symbols are processed strictly sequentially; every step is awaited before
/// the next begins and no state is shared across symbols beyond the CSV
/// stores.
pub struct ScreenerPipeline {
    config: PipelineConfig,
    indicator_config: IndicatorConfig,
    source: Box<dyn MarketDataSource>,
    indicator_store: IndicatorStore,
    company_store: CompanyStore,
    notifier: Option<Box<dyn NotificationChannel>>,
    metrics: Box<dyn MetricsCollector>,
}

impl ScreenerPipeline {
    pub fn new(
        config: PipelineConfig,
        indicator_config: IndicatorConfig,
        source: Box<dyn MarketDataSource>,
        notifier: Option<Box<dyn NotificationChannel>>,
        metrics: Box<dyn MetricsCollector>,
    ) -> Self {
        let indicator_store = IndicatorStore::new(config.indicator_csv());
        let company_store = CompanyStore::new(config.company_csv());
        Self {
            config,
            indicator_config,
            source,
            indicator_store,
            company_store,
            notifier,
            metrics,
        }
    }

    /// Run the pipeline over `symbols`, one at a time.
    ///
    /// Upstream-data problems skip the symbol; store schema errors abort the
    /// symbol; delivery failures are logged and never retried. The run
    /// itself always completes.
    pub async fn run(&mut self, symbols: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for symbol in symbols {
            match self.process_symbol(symbol).await {
                Ok(SymbolOutcome::Processed { delivered }) => {
                    summary.processed += 1;
                    if delivered {
                        summary.delivered += 1;
                    }
                }
                Ok(SymbolOutcome::Skipped) => summary.skipped += 1,
                Err(e @ ScreenerError::Schema(_)) | Err(e @ ScreenerError::Store(_)) => {
                    tracing::error!("Aborting {}: {}", symbol, e);
                    summary.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", symbol, e);
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            "Run complete: {} processed, {} skipped, {} reports delivered",
            summary.processed,
            summary.skipped,
            summary.delivered
        );
        summary
    }

    async fn process_symbol(&mut self, symbol: &str) -> Result<SymbolOutcome, ScreenerError> {
        self.metrics.record_request(symbol);

        let bars = self
            .source
            .daily_bars(symbol, &self.config.history_range)
            .await?;
        if bars.is_empty() {
            tracing::warn!("No price data for {}", symbol);
            return Ok(SymbolOutcome::Skipped);
        }

        let rows = compute_indicators(&bars, &self.indicator_config)?;
        let Some(latest) = rows.last() else {
            return Ok(SymbolOutcome::Skipped);
        };

        self.indicator_store
            .upsert(&IndicatorSnapshot::from(latest))?;

        let company = self.refresh_company_info(symbol).await?;

        let verdict = match score(latest) {
            Ok(v) => v,
            Err(ScreenerError::InsufficientData(msg)) => {
                tracing::info!("Not enough indicator history for {}: {}", symbol, msg);
                return Ok(SymbolOutcome::Processed { delivered: false });
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "{}: {} (score {}, confidence {}%)",
            symbol,
            verdict.signal.to_label(),
            verdict.score,
            verdict.confidence
        );

        let report = format_report(&company, latest, &verdict);
        let delivered = self.deliver(symbol, &report).await;

        self.metrics.record_response(symbol);
        Ok(SymbolOutcome::Processed { delivered })
    }

    /// Refetch company info and overwrite the stored row; fall back to the
    /// stored copy, then to a bare symbol-only record, when upstream has
    /// nothing.
    async fn refresh_company_info(&mut self, symbol: &str) -> Result<CompanyInfo, ScreenerError> {
        match self.source.company_info(symbol).await {
            Ok(Some(info)) => {
                self.company_store.upsert(&info)?;
                Ok(info)
            }
            Ok(None) => {
                tracing::warn!("No company info upstream for {}", symbol);
                Ok(self.company_store.get(symbol)?.unwrap_or(CompanyInfo {
                    symbol: symbol.to_uppercase(),
                    ..CompanyInfo::default()
                }))
            }
            Err(e) => {
                tracing::warn!("Company info fetch failed for {}: {}", symbol, e);
                Ok(self.company_store.get(symbol)?.unwrap_or(CompanyInfo {
                    symbol: symbol.to_uppercase(),
                    ..CompanyInfo::default()
                }))
            }
        }
    }

    async fn deliver(&self, symbol: &str, report: &str) -> bool {
        let Some(notifier) = &self.notifier else {
            tracing::info!("No notifier configured; report for {}:\n{}", symbol, report);
            return false;
        };

        match notifier.send(report).await {
            Ok(()) => {
                tracing::debug!("Report for {} sent via {}", symbol, notifier.name());
                true
            }
            Err(e) => {
                // logged, not retried
                tracing::warn!("Delivery failed for {}: {}", symbol, e);
                false
            }
        }
    }

    /// Write the metrics snapshot to the configured path.
    pub fn export_metrics(&self) -> Result<(), ScreenerError> {
        let path = &self.config.metrics_path;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScreenerError::Store(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(&self.metrics.snapshot())
            .map_err(|e| ScreenerError::Store(e.to_string()))?;
        std::fs::write(path, body).map_err(|e| ScreenerError::Store(e.to_string()))?;
        tracing::debug!("Exported metrics to {}", path.display());
        Ok(())
    }

    pub fn metrics(&self) -> &dyn MetricsCollector {
        self.metrics.as_ref()
    }
}
