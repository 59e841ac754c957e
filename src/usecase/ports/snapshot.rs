use crate::domain::entities::record::Record;
use crate::usecase::ports::source::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub id: i64,
    pub resource: String,
    pub origin: String,
    pub record_count: i64,
    pub taken_at: String,
}

/// Local copies of previously loaded record sets.
pub trait SnapshotRepository: Send + Sync {
    fn init(&self) -> Result<(), SourceError>;

    fn save_snapshot(
        &self,
        resource: &str,
        origin: &str,
        records: &[Record],
    ) -> Result<i64, SourceError>;
    fn load_latest(&self, resource: &str) -> Result<Option<Vec<Record>>, SourceError>;
    fn list_snapshots(&self, resource: Option<&str>) -> Result<Vec<SnapshotMeta>, SourceError>;
    fn prune_snapshots(&self, resource: &str, keep: usize) -> Result<usize, SourceError>;
}
