//! Read Stats Use Case

use std::sync::Arc;

use crate::application::lookup::resolve_profile;
use crate::domain::entities::ProfileStats;
use crate::domain::repository::{ProfileDirectory, StatsRepository};
use crate::domain::value_objects::VisitorId;
use crate::error::EngagementResult;

/// Read Stats Use Case
///
/// Never writes. A missing profile is an error, not zeroed stats.
pub struct ReadStatsUseCase<P, S>
where
    P: ProfileDirectory,
    S: StatsRepository,
{
    directory: Arc<P>,
    stats_repo: Arc<S>,
}

impl<P, S> ReadStatsUseCase<P, S>
where
    P: ProfileDirectory,
    S: StatsRepository,
{
    pub fn new(directory: Arc<P>, stats_repo: Arc<S>) -> Self {
        Self {
            directory,
            stats_repo,
        }
    }

    pub async fn execute(
        &self,
        username: &str,
        visitor_id: VisitorId,
    ) -> EngagementResult<ProfileStats> {
        let profile_id = resolve_profile(self.directory.as_ref(), username).await?;
        self.stats_repo.stats(profile_id, visitor_id).await
    }
}
