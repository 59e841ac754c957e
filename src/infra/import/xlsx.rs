use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::domain::entities::record::Record;
use crate::infra::import::csv::records_from_rows;

/// Excel stores timestamps as fractional days since 1899-12-30.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let timestamp = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
}

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => {
            let raw = v.to_string();
            raw.parse::<f64>()
                .ok()
                .and_then(excel_serial_to_iso)
                .unwrap_or(raw)
        }
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Reads the named worksheet, or the first one, with its first row as the
/// header.
pub fn import_xlsx_records(xlsx_path: &Path, sheet: Option<&str>) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("workbook has no sheets: {}", xlsx_path.display()))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());
    let Some(headers) = rows.next() else {
        anyhow::bail!("sheet {sheet_name} is empty")
    };
    if headers.iter().all(|header| header.trim().is_empty()) {
        anyhow::bail!("sheet {sheet_name} has no header row")
    }
    let data: Vec<Vec<String>> = rows.collect();

    let records = records_from_rows(&headers, &data);
    info!(
        path = %xlsx_path.display(),
        sheet = %sheet_name,
        count = records.len(),
        "imported xlsx records"
    );
    Ok(records)
}
