//! Toggle Like Use Case

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::lookup::resolve_profile;
use crate::domain::entities::LikeOutcome;
use crate::domain::repository::{LikeRepository, ProfileDirectory};
use crate::domain::value_objects::VisitorId;
use crate::error::EngagementResult;

/// Toggle Like Use Case
///
/// Not idempotent: clients must read stats before retrying a failed toggle.
pub struct ToggleLikeUseCase<P, L>
where
    P: ProfileDirectory,
    L: LikeRepository,
{
    directory: Arc<P>,
    like_repo: Arc<L>,
}

impl<P, L> ToggleLikeUseCase<P, L>
where
    P: ProfileDirectory,
    L: LikeRepository,
{
    pub fn new(directory: Arc<P>, like_repo: Arc<L>) -> Self {
        Self {
            directory,
            like_repo,
        }
    }

    pub async fn execute(
        &self,
        username: &str,
        visitor_id: VisitorId,
    ) -> EngagementResult<LikeOutcome> {
        self.execute_at(username, visitor_id, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        username: &str,
        visitor_id: VisitorId,
        now: DateTime<Utc>,
    ) -> EngagementResult<LikeOutcome> {
        let profile_id = resolve_profile(self.directory.as_ref(), username).await?;

        let outcome = self
            .like_repo
            .toggle_like(profile_id, visitor_id, now.timestamp_millis())
            .await?;

        tracing::info!(
            profile_id = %profile_id,
            liked = outcome.liked,
            like_count = outcome.like_count,
            "Like toggled"
        );

        Ok(outcome)
    }
}
