use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use screener_core::{IndicatorRow, ScreenerError, TrendDirection};

use crate::{column_index, fmt_opt_f64, opt_f64_field};

const COLUMNS: &[&str] = &[
    "symbol",
    "date",
    "close",
    "rsi_14",
    "macd",
    "macd_signal",
    "bb_upper",
    "bb_lower",
    "atr_14",
    "adx_14",
    "supertrend_direction",
    "supertrend_upper",
    "supertrend_lower",
];

/// Latest indicator values for one symbol, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub atr_14: Option<f64>,
    pub adx_14: Option<f64>,
    pub supertrend_direction: Option<TrendDirection>,
    pub supertrend_upper: Option<f64>,
    pub supertrend_lower: Option<f64>,
}

impl From<&IndicatorRow> for IndicatorSnapshot {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            symbol: row.symbol.clone(),
            date: row.date,
            close: row.close,
            rsi_14: row.rsi_14,
            macd: row.macd,
            macd_signal: row.macd_signal,
            bb_upper: row.bb_upper,
            bb_lower: row.bb_lower,
            atr_14: row.atr_14,
            adx_14: row.adx_14,
            supertrend_direction: row.supertrend_direction,
            supertrend_upper: row.supertrend_upper,
            supertrend_lower: row.supertrend_lower,
        }
    }
}

/// One CSV of latest indicator snapshots keyed by symbol.
pub struct IndicatorStore {
    path: PathBuf,
}

impl IndicatorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored snapshot; a missing file is an empty store.
    pub fn load_all(&self) -> Result<Vec<IndicatorSnapshot>, ScreenerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file_label = self.path.display().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| ScreenerError::Store(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| ScreenerError::Schema(e.to_string()))?
            .clone();

        let mut idx = Vec::with_capacity(COLUMNS.len());
        for name in COLUMNS {
            idx.push(column_index(&headers, name, &file_label)?);
        }

        let mut snapshots = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ScreenerError::Schema(e.to_string()))?;
            snapshots.push(parse_record(&record, &idx, &file_label)?);
        }
        Ok(snapshots)
    }

    /// Look up a single symbol's stored snapshot.
    pub fn get(&self, symbol: &str) -> Result<Option<IndicatorSnapshot>, ScreenerError> {
        let upper = symbol.to_uppercase();
        Ok(self
            .load_all()?
            .into_iter()
            .find(|s| s.symbol.to_uppercase() == upper))
    }

    /// Replace the symbol's row (or add it) and rewrite the file.
    pub fn upsert(&self, snapshot: &IndicatorSnapshot) -> Result<(), ScreenerError> {
        let mut snapshots = self.load_all()?;
        let upper = snapshot.symbol.to_uppercase();
        snapshots.retain(|s| s.symbol.to_uppercase() != upper);
        snapshots.push(snapshot.clone());
        snapshots.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        self.write_all(&snapshots)?;
        tracing::debug!(
            "Stored indicator snapshot for {} ({} rows total)",
            snapshot.symbol,
            snapshots.len()
        );
        Ok(())
    }

    fn write_all(&self, snapshots: &[IndicatorSnapshot]) -> Result<(), ScreenerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScreenerError::Store(e.to_string()))?;
        }

        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| ScreenerError::Store(e.to_string()))?;
        writer
            .write_record(COLUMNS)
            .map_err(|e| ScreenerError::Store(e.to_string()))?;

        for s in snapshots {
            writer
                .write_record(&[
                    s.symbol.clone(),
                    s.date.format("%Y-%m-%d").to_string(),
                    s.close.to_string(),
                    fmt_opt_f64(s.rsi_14),
                    fmt_opt_f64(s.macd),
                    fmt_opt_f64(s.macd_signal),
                    fmt_opt_f64(s.bb_upper),
                    fmt_opt_f64(s.bb_lower),
                    fmt_opt_f64(s.atr_14),
                    fmt_opt_f64(s.adx_14),
                    s.supertrend_direction
                        .map(|d| d.as_str().to_string())
                        .unwrap_or_default(),
                    fmt_opt_f64(s.supertrend_upper),
                    fmt_opt_f64(s.supertrend_lower),
                ])
                .map_err(|e| ScreenerError::Store(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ScreenerError::Store(e.to_string()))
    }
}

fn parse_record(
    record: &csv::StringRecord,
    idx: &[usize],
    file: &str,
) -> Result<IndicatorSnapshot, ScreenerError> {
    let field = |i: usize| record.get(idx[i]).unwrap_or("").trim();

    let symbol = field(0).to_uppercase();
    if symbol.is_empty() {
        return Err(ScreenerError::Schema(format!("{file}: empty symbol field")));
    }

    let date = NaiveDate::parse_from_str(field(1), "%Y-%m-%d")
        .map_err(|e| ScreenerError::Schema(format!("{file}: bad date for {symbol}: {e}")))?;
    let close: f64 = field(2)
        .parse()
        .map_err(|_| ScreenerError::Schema(format!("{file}: bad close for {symbol}")))?;

    let direction = match field(10) {
        "" => None,
        "up" => Some(TrendDirection::Up),
        "down" => Some(TrendDirection::Down),
        other => {
            return Err(ScreenerError::Schema(format!(
                "{file}: bad supertrend direction '{other}' for {symbol}"
            )))
        }
    };

    Ok(IndicatorSnapshot {
        symbol,
        date,
        close,
        rsi_14: opt_f64_field(record, idx[3]),
        macd: opt_f64_field(record, idx[4]),
        macd_signal: opt_f64_field(record, idx[5]),
        bb_upper: opt_f64_field(record, idx[6]),
        bb_lower: opt_f64_field(record, idx[7]),
        atr_14: opt_f64_field(record, idx[8]),
        adx_14: opt_f64_field(record, idx[9]),
        supertrend_direction: direction,
        supertrend_upper: opt_f64_field(record, idx[11]),
        supertrend_lower: opt_f64_field(record, idx[12]),
    })
}
