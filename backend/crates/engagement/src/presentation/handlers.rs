//! HTTP Handlers
//!
//! Every handler answers with the visitor cookie attached when a new
//! visitor id was issued, including on error responses.

use axum::Json;
use axum::extract::{FromRef, Path, State};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::EngagementConfig;
use crate::application::{ReadStatsUseCase, RecordViewUseCase, ToggleLikeUseCase};
use crate::domain::repository::{
    LikeRepository, ProfileDirectory, StatsRepository, ViewRepository,
};
use crate::presentation::dto::{LikeResponse, StatsResponse, ViewResponse};
use crate::presentation::visitor::Visitor;

/// Shared state for engagement handlers
#[derive(Clone)]
pub struct EngagementAppState<R>
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
    pub repo: Arc<R>,
    pub config: Arc<EngagementConfig>,
}

impl<R> FromRef<EngagementAppState<R>> for Arc<EngagementConfig>
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
    fn from_ref(state: &EngagementAppState<R>) -> Self {
        state.config.clone()
    }
}

/// POST /profiles/{username}/views
pub async fn record_view<R>(
    State(state): State<EngagementAppState<R>>,
    Path(username): Path<String>,
    visitor: Visitor,
) -> Response
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
    let use_case =
        RecordViewUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let result = use_case
        .execute(&username, visitor.id())
        .await
        .map(|outcome| Json(ViewResponse::from(outcome)));

    visitor.respond(result.into_response())
}

/// POST /profiles/{username}/like
pub async fn toggle_like<R>(
    State(state): State<EngagementAppState<R>>,
    Path(username): Path<String>,
    visitor: Visitor,
) -> Response
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
    let use_case = ToggleLikeUseCase::new(state.repo.clone(), state.repo.clone());

    let result = use_case
        .execute(&username, visitor.id())
        .await
        .map(|outcome| Json(LikeResponse::from(outcome)));

    visitor.respond(result.into_response())
}

/// GET /profiles/{username}/stats
pub async fn get_stats<R>(
    State(state): State<EngagementAppState<R>>,
    Path(username): Path<String>,
    visitor: Visitor,
) -> Response
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
    let use_case = ReadStatsUseCase::new(state.repo.clone(), state.repo.clone());

    let result = use_case
        .execute(&username, visitor.id())
        .await
        .map(|stats| Json(StatsResponse::from(stats)));

    visitor.respond(result.into_response())
}
