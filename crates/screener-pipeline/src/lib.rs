pub mod config;
pub mod metrics;
pub mod pipeline;

pub use config::PipelineConfig;
pub use metrics::{InMemoryMetrics, MetricsCollector};
pub use pipeline::{RunSummary, ScreenerPipeline};
