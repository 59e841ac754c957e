use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::infra::mock::{mock_records, MockCounts};
use crate::usecase::ports::snapshot::SnapshotRepository;
use crate::usecase::ports::source::FetchRequest;
use crate::usecase::services::record_service::FallbackProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    None,
    Mock,
    #[default]
    SnapshotThenMock,
}

pub fn mock_fallback(counts: MockCounts) -> FallbackProvider {
    Box::new(move |request: &FetchRequest| {
        mock_records(request.screen, counts, Utc::now().naive_utc())
    })
}

/// Newest stored snapshot of the resource; mock data when there is none or
/// the cache cannot be read.
pub fn snapshot_then_mock_fallback(
    snapshots: Arc<dyn SnapshotRepository>,
    counts: MockCounts,
) -> FallbackProvider {
    Box::new(move |request: &FetchRequest| {
        match snapshots.load_latest(request.resource()) {
            Ok(Some(records)) => records,
            Ok(None) => mock_records(request.screen, counts, Utc::now().naive_utc()),
            Err(err) => {
                warn!(
                    resource = request.resource(),
                    error = %err,
                    "snapshot fallback unavailable"
                );
                mock_records(request.screen, counts, Utc::now().naive_utc())
            }
        }
    })
}

pub fn build_fallback(
    strategy: FallbackStrategy,
    snapshots: Option<Arc<dyn SnapshotRepository>>,
    counts: MockCounts,
) -> Option<FallbackProvider> {
    match (strategy, snapshots) {
        (FallbackStrategy::None, _) => None,
        (FallbackStrategy::Mock, _) | (FallbackStrategy::SnapshotThenMock, None) => {
            Some(mock_fallback(counts))
        }
        (FallbackStrategy::SnapshotThenMock, Some(snapshots)) => {
            Some(snapshot_then_mock_fallback(snapshots, counts))
        }
    }
}
