//! Engagement Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::domain::repository::{
    LikeRepository, ProfileDirectory, StatsRepository, ViewRepository,
};
use crate::infra::postgres::PgEngagementRepository;
use crate::presentation::handlers::{self, EngagementAppState};

/// Create the engagement router with PostgreSQL repository
pub fn engagement_router(repo: PgEngagementRepository, config: EngagementConfig) -> Router {
    engagement_router_generic(repo, config)
}

/// Create an engagement router for any repository implementation
pub fn engagement_router_generic<R>(repo: R, config: EngagementConfig) -> Router
where
    R: ProfileDirectory
        + ViewRepository
        + LikeRepository
        + StatsRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = EngagementAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/profiles/{username}/views", post(handlers::record_view::<R>))
        .route("/profiles/{username}/like", post(handlers::toggle_like::<R>))
        .route("/profiles/{username}/stats", get(handlers::get_stats::<R>))
        .with_state(state)
}
