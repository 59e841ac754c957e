use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::entities::record::Record;
use crate::domain::entities::screen::Column;

pub fn export_records_csv(
    csv_path: &Path,
    columns: &[Column],
    records: &[&Record],
) -> Result<usize> {
    if columns.is_empty() {
        anyhow::bail!("at least one column is required for export")
    }

    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("failed to create csv: {}", csv_path.display()))?;

    writer
        .write_record(columns.iter().map(|column| column.label))
        .context("failed to write csv header")?;

    for record in records {
        let row = columns
            .iter()
            .map(|column| record.text(column.field).unwrap_or_default());
        writer
            .write_record(row)
            .with_context(|| format!("failed to write csv row for record {}", record.id()))?;
    }

    writer.flush().context("failed to flush csv")?;
    info!(path = %csv_path.display(), count = records.len(), "exported records");
    Ok(records.len())
}
