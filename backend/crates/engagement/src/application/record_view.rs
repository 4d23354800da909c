//! Record View Use Case

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::application::lookup::resolve_profile;
use crate::domain::entities::ViewOutcome;
use crate::domain::repository::{ProfileDirectory, ViewRepository};
use crate::domain::value_objects::VisitorId;
use crate::error::EngagementResult;

/// Record View Use Case
///
/// Safe to retry: a repeated call inside the dedup window is a no-op.
pub struct RecordViewUseCase<P, V>
where
    P: ProfileDirectory,
    V: ViewRepository,
{
    directory: Arc<P>,
    view_repo: Arc<V>,
    config: Arc<EngagementConfig>,
}

impl<P, V> RecordViewUseCase<P, V>
where
    P: ProfileDirectory,
    V: ViewRepository,
{
    pub fn new(directory: Arc<P>, view_repo: Arc<V>, config: Arc<EngagementConfig>) -> Self {
        Self {
            directory,
            view_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        username: &str,
        visitor_id: VisitorId,
    ) -> EngagementResult<ViewOutcome> {
        self.execute_at(username, visitor_id, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        username: &str,
        visitor_id: VisitorId,
        now: DateTime<Utc>,
    ) -> EngagementResult<ViewOutcome> {
        let profile_id = resolve_profile(self.directory.as_ref(), username).await?;

        let outcome = self
            .view_repo
            .record_view(
                profile_id,
                visitor_id,
                now.timestamp_millis(),
                self.config.dedup_window,
            )
            .await?;

        if outcome.counted {
            tracing::info!(
                profile_id = %profile_id,
                view_count = outcome.view_count,
                "View counted"
            );
        } else {
            tracing::debug!(
                profile_id = %profile_id,
                visitor_id = %visitor_id,
                "Duplicate view inside dedup window"
            );
        }

        Ok(outcome)
    }
}
