use std::path::{Path, PathBuf};

use screener_core::{CompanyInfo, ScreenerError};

use crate::{column_index, fmt_opt_f64, opt_f64_field};

const COLUMNS: &[&str] = &[
    "symbol",
    "company_name",
    "sector",
    "industry",
    "market_cap",
    "pe",
    "book_value",
    "roe",
    "roce",
    "debt",
];

/// One CSV of company fundamentals keyed by symbol.
pub struct CompanyStore {
    path: PathBuf,
}

impl CompanyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> Result<Vec<CompanyInfo>, ScreenerError> {
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

        let mut companies = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ScreenerError::Schema(e.to_string()))?;

            let text = |i: usize| -> Option<String> {
                record
                    .get(idx[i])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };

            let symbol = record.get(idx[0]).unwrap_or("").trim().to_uppercase();
            if symbol.is_empty() {
                return Err(ScreenerError::Schema(format!(
                    "{file_label}: empty symbol field"
                )));
            }

            companies.push(CompanyInfo {
                symbol,
                company_name: text(1),
                sector: text(2),
                industry: text(3),
                market_cap: opt_f64_field(&record, idx[4]),
                pe: opt_f64_field(&record, idx[5]),
                book_value: opt_f64_field(&record, idx[6]),
                roe: opt_f64_field(&record, idx[7]),
                roce: opt_f64_field(&record, idx[8]),
                debt: opt_f64_field(&record, idx[9]),
            });
        }
        Ok(companies)
    }

    pub fn get(&self, symbol: &str) -> Result<Option<CompanyInfo>, ScreenerError> {
        let upper = symbol.to_uppercase();
        Ok(self
            .load_all()?
            .into_iter()
            .find(|c| c.symbol.to_uppercase() == upper))
    }

    /// Replace the symbol's row (or add it) and rewrite the file.
    pub fn upsert(&self, info: &CompanyInfo) -> Result<(), ScreenerError> {
        let mut companies = self.load_all()?;
        let upper = info.symbol.to_uppercase();
        companies.retain(|c| c.symbol.to_uppercase() != upper);
        companies.push(info.clone());
        companies.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        self.write_all(&companies)
    }

    fn write_all(&self, companies: &[CompanyInfo]) -> Result<(), ScreenerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScreenerError::Store(e.to_string()))?;
        }

        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| ScreenerError::Store(e.to_string()))?;
        writer
            .write_record(COLUMNS)
            .map_err(|e| ScreenerError::Store(e.to_string()))?;

        for c in companies {
            writer
                .write_record(&[
                    c.symbol.clone(),
                    c.company_name.clone().unwrap_or_default(),
                    c.sector.clone().unwrap_or_default(),
                    c.industry.clone().unwrap_or_default(),
                    fmt_opt_f64(c.market_cap),
                    fmt_opt_f64(c.pe),
                    fmt_opt_f64(c.book_value),
                    fmt_opt_f64(c.roe),
                    fmt_opt_f64(c.roce),
                    fmt_opt_f64(c.debt),
                ])
                .map_err(|e| ScreenerError::Store(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ScreenerError::Store(e.to_string()))
    }
}
