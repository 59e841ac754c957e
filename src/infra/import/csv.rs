use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::entities::record::{dedupe_by_id, FieldValue, Record, RecordId, ID_FIELD};

/// Turns header + rows into records. A numeric `id` column supplies the
/// ids; rows without one take their row number, or the next number not
/// already claimed by the column. Repeated ids keep the first row.
pub fn records_from_rows(headers: &[String], rows: &[Vec<String>]) -> Vec<Record> {
    let id_col = headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(ID_FIELD));
    let explicit_id = |row: &Vec<String>| {
        id_col
            .and_then(|col| row.get(col))
            .and_then(|cell| cell.trim().parse::<i64>().ok())
    };

    let rows: Vec<(usize, &Vec<String>)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    let mut taken: HashSet<i64> = rows
        .iter()
        .filter_map(|(_, row)| explicit_id(*row))
        .collect();

    let records = rows
        .into_iter()
        .map(|(row_idx, row)| {
            let id = explicit_id(row).unwrap_or_else(|| {
                let mut candidate = row_idx as i64 + 1;
                while taken.contains(&candidate) {
                    candidate += 1;
                }
                taken.insert(candidate);
                candidate
            });
            let mut record = Record::new(RecordId(id));
            for (col_idx, header) in headers.iter().enumerate() {
                let name = header.trim();
                if name.is_empty() || Some(col_idx) == id_col {
                    continue;
                }
                if let Some(value) = row.get(col_idx).and_then(|cell| FieldValue::infer(cell)) {
                    record.set(name, value);
                }
            }
            record
        })
        .collect();

    let (records, dropped) = dedupe_by_id(records);
    if dropped > 0 {
        warn!(dropped, "dropped imported rows with a repeated id");
    }
    records
}

pub fn import_csv_records(csv_path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .iter()
        .map(|header| header.to_string())
        .collect();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    let records = records_from_rows(&headers, &rows);
    info!(path = %csv_path.display(), count = records.len(), "imported csv records");
    Ok(records)
}
