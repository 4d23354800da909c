//! Domain Entities
//!
//! Core records of the engagement domain and the outcomes of mutating it.

use crate::domain::value_objects::{ProfileId, VisitorId};

/// One counted page visit. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    pub profile_id: ProfileId,
    pub visitor_id: VisitorId,
    pub viewed_at_ms: i64,
}

impl ViewEvent {
    pub fn new(profile_id: ProfileId, visitor_id: VisitorId, viewed_at_ms: i64) -> Self {
        Self {
            profile_id,
            visitor_id,
            viewed_at_ms,
        }
    }
}

/// A visitor's like of a profile. At most one per (profile, visitor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeEdge {
    pub profile_id: ProfileId,
    pub visitor_id: VisitorId,
    pub liked_at_ms: i64,
}

impl LikeEdge {
    pub fn new(profile_id: ProfileId, visitor_id: VisitorId, liked_at_ms: i64) -> Self {
        Self {
            profile_id,
            visitor_id,
            liked_at_ms,
        }
    }
}

/// Engagement totals for one profile, as seen by one visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub view_count: i64,
    pub like_count: i64,
    pub is_liked: bool,
}

/// Result of recording a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOutcome {
    /// False when the view fell inside the dedup window
    pub counted: bool,
    pub view_count: i64,
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Like state after the toggle
    pub liked: bool,
    pub like_count: i64,
}

/// A maintained view counter that disagreed with its event log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsDrift {
    pub profile_id: ProfileId,
    pub stored: i64,
    pub actual: i64,
}

impl StatsDrift {
    /// Positive when the counter overcounted
    pub fn delta(&self) -> i64 {
        self.stored - self.actual
    }
}
