//! API DTOs (Data Transfer Objects)

use serde::Serialize;

use crate::domain::entities::{LikeOutcome, ProfileStats, ViewOutcome};

/// Response for POST /profiles/{username}/views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub counted: bool,
    pub view_count: i64,
}

impl From<ViewOutcome> for ViewResponse {
    fn from(outcome: ViewOutcome) -> Self {
        Self {
            counted: outcome.counted,
            view_count: outcome.view_count,
        }
    }
}

/// Response for POST /profiles/{username}/like
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

impl From<LikeOutcome> for LikeResponse {
    fn from(outcome: LikeOutcome) -> Self {
        Self {
            liked: outcome.liked,
            like_count: outcome.like_count,
        }
    }
}

/// Response for GET /profiles/{username}/stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub view_count: i64,
    pub like_count: i64,
    pub is_liked: bool,
}

impl From<ProfileStats> for StatsResponse {
    fn from(stats: ProfileStats) -> Self {
        Self {
            view_count: stats.view_count,
            like_count: stats.like_count,
            is_liked: stats.is_liked,
        }
    }
}
