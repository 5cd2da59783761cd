//! CSV-backed snapshot stores, one row per symbol.
//!
//! Both stores follow the same contract: `upsert` replaces any existing row
//! for the symbol and rewrites the whole file. The read path resolves the
//! header row into an explicit column-index map and fails with a schema
//! error when a required column is absent; it never guesses columns by
//! substring.
//!
//! Read-modify-write is not atomic; concurrent writers to the same file can
//! race. Known limitation.

mod companies;
mod indicators;

pub use companies::CompanyStore;
pub use indicators::{IndicatorSnapshot, IndicatorStore};

use screener_core::ScreenerError;

pub(crate) fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    file: &str,
) -> Result<usize, ScreenerError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ScreenerError::Schema(format!("{file} missing required column '{name}'")))
}

pub(crate) fn opt_f64_field(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

pub(crate) fn fmt_opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
