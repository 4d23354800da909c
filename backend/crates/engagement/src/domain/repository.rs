//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//!
//! Every mutating method is a single atomic operation on the store: callers
//! never split a check-then-act sequence across two calls.

use crate::domain::entities::{LikeOutcome, ProfileStats, StatsDrift, ViewOutcome};
use crate::domain::value_objects::{DedupWindow, ProfileId, Username, VisitorId};
use crate::error::EngagementResult;

/// Username to profile lookup, owned by the profile wizard side
#[trait_variant::make(ProfileDirectory: Send)]
pub trait LocalProfileDirectory {
    async fn find_profile_id(&self, username: &Username) -> EngagementResult<Option<ProfileId>>;
}

/// View counting
#[trait_variant::make(ViewRepository: Send)]
pub trait LocalViewRepository {
    /// Count a view unless one was counted for the same pair within `window`.
    ///
    /// Writes the dedup mark, appends the view event and bumps the counter
    /// together, or writes nothing.
    async fn record_view(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
        now_ms: i64,
        window: DedupWindow,
    ) -> EngagementResult<ViewOutcome>;

    /// Recompute every view counter from the event log, fixing mismatches
    async fn reconcile_view_counts(&self) -> EngagementResult<Vec<StatsDrift>>;
}

/// Like toggling
#[trait_variant::make(LikeRepository: Send)]
pub trait LocalLikeRepository {
    /// Remove the visitor's like if present, otherwise add it.
    ///
    /// The returned count is derived from the stored edges.
    async fn toggle_like(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
        now_ms: i64,
    ) -> EngagementResult<LikeOutcome>;
}

/// Read-only stats
#[trait_variant::make(StatsRepository: Send)]
pub trait LocalStatsRepository {
    async fn stats(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
    ) -> EngagementResult<ProfileStats>;
}
