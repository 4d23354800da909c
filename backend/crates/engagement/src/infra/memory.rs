//! In-Memory Repository
//!
//! Process-local store for development and tests. Every operation runs under
//! one mutex, which gives the same per-operation atomicity the Postgres
//! statements provide.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::{
    LikeEdge, LikeOutcome, ProfileStats, StatsDrift, ViewEvent, ViewOutcome,
};
use crate::domain::repository::{
    LikeRepository, ProfileDirectory, StatsRepository, ViewRepository,
};
use crate::domain::services::should_count_view;
use crate::domain::value_objects::{DedupWindow, ProfileId, Username, VisitorId};
use crate::error::{EngagementError, EngagementResult};

#[derive(Default)]
struct MemoryState {
    profiles: HashMap<String, ProfileId>,
    view_marks: HashMap<(ProfileId, VisitorId), i64>,
    view_events: Vec<ViewEvent>,
    view_counts: HashMap<ProfileId, i64>,
    likes: HashMap<(ProfileId, VisitorId), LikeEdge>,
}

impl MemoryState {
    fn like_count(&self, profile_id: ProfileId) -> i64 {
        self.likes.keys().filter(|(p, _)| *p == profile_id).count() as i64
    }

    fn event_count(&self, profile_id: ProfileId) -> i64 {
        self.view_events
            .iter()
            .filter(|e| e.profile_id == profile_id)
            .count() as i64
    }
}

/// Mutex-guarded engagement store
#[derive(Clone, Default)]
pub struct InMemoryEngagementRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryEngagementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a profile under `username`, returning its id.
    ///
    /// Registering an existing username returns the existing id.
    pub fn register_profile(&self, username: &str) -> EngagementResult<ProfileId> {
        let username = Username::parse(username)?;
        self.with_state(|state| {
            Ok(*state
                .profiles
                .entry(username.as_str().to_string())
                .or_insert_with(ProfileId::new))
        })
    }

    /// Number of stored view events for a profile
    pub fn view_event_count(&self, profile_id: ProfileId) -> EngagementResult<i64> {
        self.with_state(|state| Ok(state.event_count(profile_id)))
    }

    /// Number of like edges stored for one (profile, visitor) pair
    pub fn like_edge_count(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
    ) -> EngagementResult<usize> {
        self.with_state(|state| {
            Ok(state
                .likes
                .keys()
                .filter(|key| **key == (profile_id, visitor_id))
                .count())
        })
    }

    /// Overwrite a maintained view counter, simulating a drifted aggregate
    #[cfg(test)]
    pub(crate) fn force_view_count(&self, profile_id: ProfileId, count: i64) {
        if let Ok(mut state) = self.state.lock() {
            state.view_counts.insert(profile_id, count);
        }
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut MemoryState) -> EngagementResult<T>,
    ) -> EngagementResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| EngagementError::StoreUnavailable("state lock poisoned".to_string()))?;
        f(&mut state)
    }
}

impl ProfileDirectory for InMemoryEngagementRepository {
    async fn find_profile_id(&self, username: &Username) -> EngagementResult<Option<ProfileId>> {
        self.with_state(|state| Ok(state.profiles.get(username.as_str()).copied()))
    }
}

impl ViewRepository for InMemoryEngagementRepository {
    async fn record_view(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
        now_ms: i64,
        window: DedupWindow,
    ) -> EngagementResult<ViewOutcome> {
        self.with_state(|state| {
            let last = state.view_marks.get(&(profile_id, visitor_id)).copied();

            if !should_count_view(last, now_ms, window) {
                let view_count = state.view_counts.get(&profile_id).copied().unwrap_or(0);
                return Ok(ViewOutcome {
                    counted: false,
                    view_count,
                });
            }

            state.view_marks.insert((profile_id, visitor_id), now_ms);
            state
                .view_events
                .push(ViewEvent::new(profile_id, visitor_id, now_ms));
            let count = state.view_counts.entry(profile_id).or_insert(0);
            *count += 1;

            Ok(ViewOutcome {
                counted: true,
                view_count: *count,
            })
        })
    }

    async fn reconcile_view_counts(&self) -> EngagementResult<Vec<StatsDrift>> {
        self.with_state(|state| {
            let mut profile_ids: Vec<ProfileId> = state.view_counts.keys().copied().collect();
            profile_ids.extend(state.view_events.iter().map(|e| e.profile_id));
            profile_ids.sort_by_key(|id| *id.as_uuid());
            profile_ids.dedup();

            let mut drifts = Vec::new();
            for profile_id in profile_ids {
                let stored = state.view_counts.get(&profile_id).copied().unwrap_or(0);
                let actual = state.event_count(profile_id);
                if stored != actual {
                    state.view_counts.insert(profile_id, actual);
                    drifts.push(StatsDrift {
                        profile_id,
                        stored,
                        actual,
                    });
                }
            }
            Ok(drifts)
        })
    }
}

impl LikeRepository for InMemoryEngagementRepository {
    async fn toggle_like(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
        now_ms: i64,
    ) -> EngagementResult<LikeOutcome> {
        self.with_state(|state| {
            let key = (profile_id, visitor_id);
            let liked = if state.likes.remove(&key).is_some() {
                false
            } else {
                state
                    .likes
                    .insert(key, LikeEdge::new(profile_id, visitor_id, now_ms));
                true
            };

            Ok(LikeOutcome {
                liked,
                like_count: state.like_count(profile_id),
            })
        })
    }
}

impl StatsRepository for InMemoryEngagementRepository {
    async fn stats(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
    ) -> EngagementResult<ProfileStats> {
        self.with_state(|state| {
            Ok(ProfileStats {
                view_count: state.view_counts.get(&profile_id).copied().unwrap_or(0),
                like_count: state.like_count(profile_id),
                is_liked: state.likes.contains_key(&(profile_id, visitor_id)),
            })
        })
    }
}
