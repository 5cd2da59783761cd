use std::path::PathBuf;

/// Pipeline settings, loaded from environment variables with the original
/// project's directory layout as defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the data tree (`raw/`, `processed/`, `snapshots/`).
    pub data_dir: PathBuf,
    /// Yahoo range string for price history, e.g. "9mo".
    pub history_range: String,
    /// Where the metrics snapshot is written after a run.
    pub metrics_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_range: "9mo".to_string(),
            metrics_path: PathBuf::from("logs/metrics.json"),
        }
    }
}

impl PipelineConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("SCREENER_DATA_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            history_range: std::env::var("SCREENER_HISTORY_RANGE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.history_range),
            metrics_path: std::env::var("SCREENER_METRICS_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.metrics_path),
        }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn index_snapshot_dir(&self) -> PathBuf {
        self.data_dir.join("snapshots").join("indices")
    }

    pub fn indicator_csv(&self) -> PathBuf {
        self.processed_dir().join("technical_indicators.csv")
    }

    pub fn company_csv(&self) -> PathBuf {
        self.processed_dir().join("company_info.csv")
    }

    pub fn listings_csv(&self) -> PathBuf {
        self.raw_dir().join("listed_companies.csv")
    }

    pub fn sme_listings_csv(&self) -> PathBuf {
        self.raw_dir().join("listed_sme_companies.csv")
    }
}
