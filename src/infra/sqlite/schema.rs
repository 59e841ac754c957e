use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS snapshot (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            resource     TEXT NOT NULL,
            origin       TEXT NOT NULL,
            record_count INTEGER NOT NULL,
            taken_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS snapshot_field (
            snapshot_id INTEGER NOT NULL,
            record_id   INTEGER NOT NULL,
            position    INTEGER NOT NULL,
            field       TEXT NOT NULL,
            kind        TEXT NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (snapshot_id, position, field),
            FOREIGN KEY (snapshot_id) REFERENCES snapshot(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_snapshot_resource
            ON snapshot(resource, id);

        CREATE INDEX IF NOT EXISTS idx_snapshot_field_position
            ON snapshot_field(snapshot_id, position);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
