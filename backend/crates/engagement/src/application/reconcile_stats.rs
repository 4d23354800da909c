//! Reconcile Stats Use Case
//!
//! Rebuilds maintained view counters from the view event log. Like counts
//! are always derived and need no reconciliation.

use std::sync::Arc;

use crate::domain::entities::StatsDrift;
use crate::domain::repository::ViewRepository;
use crate::error::EngagementResult;

#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Counters that were corrected
    pub drifts: Vec<StatsDrift>,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.drifts.is_empty()
    }
}

pub struct ReconcileStatsUseCase<V>
where
    V: ViewRepository,
{
    view_repo: Arc<V>,
}

impl<V> ReconcileStatsUseCase<V>
where
    V: ViewRepository,
{
    pub fn new(view_repo: Arc<V>) -> Self {
        Self { view_repo }
    }

    pub async fn execute(&self) -> EngagementResult<ReconcileReport> {
        let drifts = self.view_repo.reconcile_view_counts().await?;

        for drift in &drifts {
            tracing::warn!(
                profile_id = %drift.profile_id,
                stored = drift.stored,
                actual = drift.actual,
                "View counter drift corrected"
            );
        }

        tracing::info!(corrected = drifts.len(), "View counter reconciliation completed");

        Ok(ReconcileReport { drifts })
    }
}
