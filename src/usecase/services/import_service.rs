use std::path::Path;

use anyhow::{bail, Result};

use crate::domain::entities::record::Record;
use crate::infra::import::csv::import_csv_records;
use crate::infra::import::xlsx::import_xlsx_records;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    pub fn from_path(path: &Path) -> Option<ImportFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())?;
        match ext.as_str() {
            "csv" => Some(ImportFormat::Csv),
            "xlsx" | "xls" | "xlsm" | "ods" => Some(ImportFormat::Xlsx),
            _ => None,
        }
    }
}

/// Loads records from a local spreadsheet. Workbooks are read from their
/// first sheet unless `sheet` names another.
#[derive(Debug, Clone, Default)]
pub struct ImportService {
    sheet: Option<String>,
}

impl ImportService {
    pub fn new(sheet: Option<String>) -> Self {
        Self { sheet }
    }

    pub fn import_file(&self, path: &Path) -> Result<Vec<Record>> {
        match ImportFormat::from_path(path) {
            Some(ImportFormat::Csv) => import_csv_records(path),
            Some(ImportFormat::Xlsx) => import_xlsx_records(path, self.sheet.as_deref()),
            None => bail!("unsupported file type: {}", path.display()),
        }
    }
}
