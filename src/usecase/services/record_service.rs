use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::domain::entities::record::Record;
use crate::usecase::ports::snapshot::{SnapshotMeta, SnapshotRepository};
use crate::usecase::ports::source::{FetchRequest, RecordSource, SourceError};

/// Supplies records when the live source is unavailable.
pub type FallbackProvider = Box<dyn Fn(&FetchRequest) -> Vec<Record> + Send + Sync>;

/// Number of snapshots kept per resource after a live load.
pub const SNAPSHOTS_KEPT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Live,
    Fallback,
}

impl LoadOrigin {
    pub fn label(self) -> &'static str {
        match self {
            LoadOrigin::Live => "live",
            LoadOrigin::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub origin: LoadOrigin,
    pub warning: Option<String>,
}

pub struct RecordService {
    source: Arc<dyn RecordSource>,
    fallback: Option<FallbackProvider>,
    snapshots: Option<Arc<dyn SnapshotRepository>>,
    authenticated: bool,
}

impl RecordService {
    pub fn new(source: Arc<dyn RecordSource>, authenticated: bool) -> Self {
        Self {
            source,
            fallback: None,
            snapshots: None,
            authenticated,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackProvider) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_snapshots(mut self, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Without credentials the live source is never called. A failed live
    /// fetch is replaced by the fallback collection when one is configured.
    /// Only unfiltered live loads are stored as snapshots of the resource.
    pub fn load(
        &self,
        request: &FetchRequest,
        now: NaiveDateTime,
    ) -> Result<LoadOutcome, SourceError> {
        if !self.authenticated {
            info!(
                resource = request.resource(),
                "not authenticated, using fallback records"
            );
            return self.fall_back(request, SourceError::Unauthenticated, None);
        }

        match self.source.fetch(request) {
            Ok(records) => {
                let records = request.screen.normalize(records, now);
                info!(
                    resource = request.resource(),
                    source = %self.source.describe(),
                    count = records.len(),
                    "loaded records"
                );
                if request.params.is_empty() {
                    self.store_snapshot(request.resource(), "live", &records);
                } else {
                    debug!(
                        resource = request.resource(),
                        params = ?request.params,
                        "server-filtered load not stored as snapshot"
                    );
                }
                Ok(LoadOutcome {
                    records,
                    origin: LoadOrigin::Live,
                    warning: None,
                })
            }
            Err(err) => {
                warn!(
                    resource = request.resource(),
                    source = %self.source.describe(),
                    error = %err,
                    "record fetch failed"
                );
                let warning = format!("{} unavailable: {err}", self.source.describe());
                self.fall_back(request, err, Some(warning))
            }
        }
    }

    /// Keeps a copy of records that came from somewhere other than the live
    /// source, such as a file import.
    pub fn remember(&self, request: &FetchRequest, origin: &str, records: &[Record]) {
        self.store_snapshot(request.resource(), origin, records);
    }

    pub fn snapshot_history(&self, resource: &str) -> Vec<SnapshotMeta> {
        let Some(snapshots) = &self.snapshots else {
            return Vec::new();
        };
        match snapshots.list_snapshots(Some(resource)) {
            Ok(list) => list,
            Err(err) => {
                warn!(resource, error = %err, "failed to list snapshots");
                Vec::new()
            }
        }
    }

    fn fall_back(
        &self,
        request: &FetchRequest,
        err: SourceError,
        warning: Option<String>,
    ) -> Result<LoadOutcome, SourceError> {
        let Some(fallback) = &self.fallback else {
            return Err(err);
        };
        let records = fallback(request);
        info!(
            resource = request.resource(),
            count = records.len(),
            "using fallback records"
        );
        Ok(LoadOutcome {
            records,
            origin: LoadOrigin::Fallback,
            warning,
        })
    }

    fn store_snapshot(&self, resource: &str, origin: &str, records: &[Record]) {
        let Some(snapshots) = &self.snapshots else {
            return;
        };
        let result = snapshots
            .save_snapshot(resource, origin, records)
            .and_then(|_| snapshots.prune_snapshots(resource, SNAPSHOTS_KEPT));
        if let Err(err) = result {
            warn!(resource, error = %err, "failed to store snapshot");
        }
    }
}
