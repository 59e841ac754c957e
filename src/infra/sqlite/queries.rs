use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;

use crate::domain::entities::record::{FieldValue, Record, RecordId, ID_FIELD};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::snapshot::SnapshotMeta;

const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn encode_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Date(timestamp) => timestamp.format(STORED_TIMESTAMP_FORMAT).to_string(),
    }
}

fn decode_value(kind: &str, value: &str) -> Result<FieldValue> {
    match kind {
        "text" => Ok(FieldValue::Text(value.to_string())),
        "number" => value
            .parse::<f64>()
            .map(FieldValue::Number)
            .with_context(|| format!("invalid stored number: {value}")),
        "date" => NaiveDateTime::parse_from_str(value, STORED_TIMESTAMP_FORMAT)
            .map(FieldValue::Date)
            .with_context(|| format!("invalid stored date: {value}")),
        other => anyhow::bail!("unknown stored value kind: {other}"),
    }
}

pub fn save_snapshot(
    db_path: &Path,
    resource: &str,
    origin: &str,
    records: &[Record],
) -> Result<i64> {
    init_db(db_path)?;

    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start snapshot transaction")?;

    tx.execute(
        "INSERT INTO snapshot(resource, origin, record_count, taken_at)
         VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%f', 'now'))",
        params![resource, origin, records.len() as i64],
    )
    .context("failed to insert snapshot")?;
    let snapshot_id = tx.last_insert_rowid();

    let mut insert_field = tx
        .prepare(
            "INSERT INTO snapshot_field(snapshot_id, record_id, position, field, kind, value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .context("failed to prepare snapshot field insert")?;

    for (position, record) in records.iter().enumerate() {
        for (field, value) in record.fields() {
            insert_field
                .execute(params![
                    snapshot_id,
                    record.id().0,
                    position as i64,
                    field,
                    value.kind(),
                    encode_value(value)
                ])
                .context("failed to insert snapshot field")?;
        }
    }
    drop(insert_field);

    tx.commit().context("failed to commit snapshot transaction")?;
    Ok(snapshot_id)
}

pub fn load_snapshot_records(db_path: &Path, snapshot_id: i64) -> Result<Vec<Record>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT record_id, position, field, kind, value
             FROM snapshot_field
             WHERE snapshot_id = ?1
             ORDER BY position ASC, field ASC",
        )
        .context("failed to prepare snapshot field query")?;

    let rows = stmt
        .query_map([snapshot_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .context("failed to query snapshot fields")?;

    let mut records: Vec<Record> = Vec::new();
    let mut current_position = None;
    for row in rows {
        let (record_id, position, field, kind, value) =
            row.context("failed to read snapshot field row")?;
        if current_position != Some(position) {
            records.push(Record::new(RecordId(record_id)));
            current_position = Some(position);
        }
        if field == ID_FIELD {
            continue;
        }
        let value = decode_value(&kind, &value)?;
        if let Some(record) = records.last_mut() {
            record.set(&field, value);
        }
    }

    Ok(records)
}

pub fn latest_snapshot_id(db_path: &Path, resource: &str) -> Result<Option<i64>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id FROM snapshot
             WHERE resource = ?1
             ORDER BY id DESC
             LIMIT 1",
        )
        .context("failed to prepare latest snapshot query")?;
    let mut rows = stmt
        .query_map([resource], |row| row.get::<_, i64>(0))
        .context("failed to query latest snapshot")?;
    rows.next()
        .transpose()
        .context("failed to read latest snapshot id")
}

pub fn load_latest_snapshot(db_path: &Path, resource: &str) -> Result<Option<Vec<Record>>> {
    init_db(db_path)?;
    match latest_snapshot_id(db_path, resource)? {
        Some(snapshot_id) => load_snapshot_records(db_path, snapshot_id).map(Some),
        None => Ok(None),
    }
}

pub fn list_snapshots(db_path: &Path, resource: Option<&str>) -> Result<Vec<SnapshotMeta>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, resource, origin, record_count, taken_at
             FROM snapshot
             WHERE (?1 IS NULL OR resource = ?1)
             ORDER BY id DESC",
        )
        .context("failed to prepare snapshot list query")?;

    let snapshots = stmt
        .query_map([resource], |row| {
            Ok(SnapshotMeta {
                id: row.get(0)?,
                resource: row.get(1)?,
                origin: row.get(2)?,
                record_count: row.get(3)?,
                taken_at: row.get(4)?,
            })
        })
        .context("failed to query snapshots")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect snapshots")?;

    Ok(snapshots)
}

/// Deletes all but the `keep` newest snapshots of `resource`.
pub fn prune_snapshots(db_path: &Path, resource: &str, keep: usize) -> Result<usize> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start prune transaction")?;

    let stale: Vec<i64> = {
        let mut stmt = tx
            .prepare(
                "SELECT id FROM snapshot
                 WHERE resource = ?1
                 ORDER BY id DESC
                 LIMIT -1 OFFSET ?2",
            )
            .context("failed to prepare stale snapshot query")?;
        let ids = stmt
            .query_map(params![resource, keep as i64], |row| row.get::<_, i64>(0))
            .context("failed to query stale snapshots")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to collect stale snapshots")?;
        ids
    };

    for snapshot_id in &stale {
        tx.execute(
            "DELETE FROM snapshot_field WHERE snapshot_id = ?1",
            params![snapshot_id],
        )
        .with_context(|| format!("failed to delete fields of snapshot #{snapshot_id}"))?;
        tx.execute("DELETE FROM snapshot WHERE id = ?1", params![snapshot_id])
            .with_context(|| format!("failed to delete snapshot #{snapshot_id}"))?;
    }

    tx.commit().context("failed to commit prune transaction")?;
    Ok(stale.len())
}
