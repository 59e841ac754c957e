use std::path::PathBuf;

use crate::domain::entities::record::Record;
use crate::infra::sqlite::queries::{
    list_snapshots, load_latest_snapshot, prune_snapshots, save_snapshot,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::snapshot::{SnapshotMeta, SnapshotRepository};
use crate::usecase::ports::source::{FetchRequest, RecordSource, SourceError};

pub struct SqliteSnapshotRepo {
    pub db_path: PathBuf,
}

fn storage_error(err: anyhow::Error) -> SourceError {
    SourceError::Storage(format!("{err:#}"))
}

impl SnapshotRepository for SqliteSnapshotRepo {
    fn init(&self) -> Result<(), SourceError> {
        init_db(&self.db_path).map_err(storage_error)
    }

    fn save_snapshot(
        &self,
        resource: &str,
        origin: &str,
        records: &[Record],
    ) -> Result<i64, SourceError> {
        save_snapshot(&self.db_path, resource, origin, records).map_err(storage_error)
    }

    fn load_latest(&self, resource: &str) -> Result<Option<Vec<Record>>, SourceError> {
        load_latest_snapshot(&self.db_path, resource).map_err(storage_error)
    }

    fn list_snapshots(&self, resource: Option<&str>) -> Result<Vec<SnapshotMeta>, SourceError> {
        list_snapshots(&self.db_path, resource).map_err(storage_error)
    }

    fn prune_snapshots(&self, resource: &str, keep: usize) -> Result<usize, SourceError> {
        prune_snapshots(&self.db_path, resource, keep).map_err(storage_error)
    }
}

/// Serves the newest stored snapshot as if it were a live source.
pub struct SnapshotSource {
    pub repo: SqliteSnapshotRepo,
}

impl RecordSource for SnapshotSource {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>, SourceError> {
        self.repo
            .load_latest(request.resource())?
            .ok_or_else(|| {
                SourceError::Storage(format!("no snapshot stored for {}", request.resource()))
            })
    }

    fn describe(&self) -> String {
        format!("snapshot cache {}", self.repo.db_path.display())
    }
}
