//! PostgreSQL Repository Implementations
//!
//! Each trait method is one SQL statement. Data-modifying CTEs keep the
//! dedup check, event append and counter bump inside a single atomic
//! statement, so concurrent requests never observe or leave partial state.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{LikeOutcome, ProfileStats, StatsDrift, ViewOutcome};
use crate::domain::repository::{
    LikeRepository, ProfileDirectory, StatsRepository, ViewRepository,
};
use crate::domain::value_objects::{DedupWindow, ProfileId, Username, VisitorId};
use crate::error::EngagementResult;

/// PostgreSQL-backed engagement repository
#[derive(Clone)]
pub struct PgEngagementRepository {
    pool: PgPool,
}

impl PgEngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drop dedup marks that can no longer suppress a view.
    ///
    /// A mark older than the window behaves exactly like a missing one, so
    /// removing it changes no outcome.
    pub async fn cleanup_stale_marks(&self, window: DedupWindow) -> EngagementResult<u64> {
        let cutoff_ms = window.cutoff_ms(Utc::now().timestamp_millis());

        let result = sqlx::query("DELETE FROM profile_view_marks WHERE last_counted_at_ms < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

impl ProfileDirectory for PgEngagementRepository {
    async fn find_profile_id(&self, username: &Username) -> EngagementResult<Option<ProfileId>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT profile_id FROM profiles WHERE username_canonical = $1",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(ProfileId::from_uuid))
    }
}

impl ViewRepository for PgEngagementRepository {
    async fn record_view(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
        now_ms: i64,
        window: DedupWindow,
    ) -> EngagementResult<ViewOutcome> {
        // The mark upsert only writes when the previous counted view is older
        // than the cutoff. Concurrent duplicates block on the mark row and then
        // fail the WHERE, so at most one of them reaches `event`.
        let (counted, view_count) = sqlx::query_as::<_, (bool, i64)>(
            r#"
            WITH mark AS (
                INSERT INTO profile_view_marks (profile_id, visitor_id, last_counted_at_ms)
                VALUES ($1, $2, $3)
                ON CONFLICT (profile_id, visitor_id) DO UPDATE
                    SET last_counted_at_ms = EXCLUDED.last_counted_at_ms
                    WHERE profile_view_marks.last_counted_at_ms < $4
                RETURNING profile_id
            ),
            event AS (
                INSERT INTO profile_view_events (profile_id, visitor_id, viewed_at_ms)
                SELECT profile_id, $2, $3 FROM mark
                RETURNING profile_id
            ),
            bumped AS (
                INSERT INTO profile_stats (profile_id, view_count, updated_at_ms)
                SELECT profile_id, 1, $3 FROM event
                ON CONFLICT (profile_id) DO UPDATE
                    SET view_count = profile_stats.view_count + 1,
                        updated_at_ms = EXCLUDED.updated_at_ms
                RETURNING view_count
            )
            SELECT
                EXISTS (SELECT 1 FROM bumped) AS counted,
                COALESCE(
                    (SELECT view_count FROM bumped),
                    (SELECT view_count FROM profile_stats WHERE profile_id = $1),
                    0
                )::BIGINT AS view_count
            "#,
        )
        .bind(profile_id.as_uuid())
        .bind(visitor_id.as_uuid())
        .bind(now_ms)
        .bind(window.cutoff_ms(now_ms))
        .fetch_one(&self.pool)
        .await?;

        Ok(ViewOutcome {
            counted,
            view_count,
        })
    }

    async fn reconcile_view_counts(&self) -> EngagementResult<Vec<StatsDrift>> {
        let now_ms = Utc::now().timestamp_millis();

        // Corrections are applied as deltas so increments committed after this
        // statement's snapshot are preserved.
        let rows = sqlx::query_as::<_, DriftRow>(
            r#"
            WITH actual AS (
                SELECT profile_id, COUNT(*)::BIGINT AS view_count
                FROM profile_view_events
                GROUP BY profile_id
            ),
            drifted AS (
                SELECT
                    COALESCE(s.profile_id, a.profile_id) AS profile_id,
                    (s.profile_id IS NOT NULL) AS has_row,
                    COALESCE(s.view_count, 0)::BIGINT AS stored,
                    COALESCE(a.view_count, 0)::BIGINT AS actual
                FROM profile_stats s
                FULL OUTER JOIN actual a ON a.profile_id = s.profile_id
                WHERE COALESCE(s.view_count, 0) <> COALESCE(a.view_count, 0)
            ),
            updated AS (
                UPDATE profile_stats s
                SET view_count = s.view_count + (d.actual - d.stored),
                    updated_at_ms = $1
                FROM drifted d
                WHERE d.has_row AND s.profile_id = d.profile_id
                RETURNING s.profile_id
            ),
            inserted AS (
                INSERT INTO profile_stats (profile_id, view_count, updated_at_ms)
                SELECT profile_id, actual, $1 FROM drifted WHERE NOT has_row
                ON CONFLICT (profile_id) DO UPDATE
                    SET view_count = profile_stats.view_count + EXCLUDED.view_count,
                        updated_at_ms = EXCLUDED.updated_at_ms
                RETURNING profile_id
            )
            SELECT profile_id, stored, actual
            FROM drifted
            WHERE profile_id IN (
                SELECT profile_id FROM updated
                UNION ALL
                SELECT profile_id FROM inserted
            )
            "#,
        )
        .bind(now_ms)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DriftRow::into_drift).collect())
    }
}

impl LikeRepository for PgEngagementRepository {
    async fn toggle_like(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
        now_ms: i64,
    ) -> EngagementResult<LikeOutcome> {
        // `removed` is empty when no edge existed in this snapshot. If a
        // concurrent toggle inserted the edge meanwhile, the insert hits the
        // primary key and does nothing: the visitor still ends up liked.
        let removed = sqlx::query_scalar::<_, bool>(
            r#"
            WITH removed AS (
                DELETE FROM profile_likes
                WHERE profile_id = $1 AND visitor_id = $2
                RETURNING profile_id
            ),
            added AS (
                INSERT INTO profile_likes (profile_id, visitor_id, liked_at_ms)
                SELECT $1, $2, $3
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT (profile_id, visitor_id) DO NOTHING
                RETURNING profile_id
            )
            SELECT EXISTS (SELECT 1 FROM removed)
            "#,
        )
        .bind(profile_id.as_uuid())
        .bind(visitor_id.as_uuid())
        .bind(now_ms)
        .fetch_one(&self.pool)
        .await?;

        let like_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM profile_likes WHERE profile_id = $1",
        )
        .bind(profile_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(LikeOutcome {
            liked: !removed,
            like_count,
        })
    }
}

impl StatsRepository for PgEngagementRepository {
    async fn stats(
        &self,
        profile_id: ProfileId,
        visitor_id: VisitorId,
    ) -> EngagementResult<ProfileStats> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COALESCE(
                    (SELECT view_count FROM profile_stats WHERE profile_id = $1),
                    0
                )::BIGINT AS view_count,
                (SELECT COUNT(*) FROM profile_likes WHERE profile_id = $1) AS like_count,
                EXISTS (
                    SELECT 1 FROM profile_likes
                    WHERE profile_id = $1 AND visitor_id = $2
                ) AS is_liked
            "#,
        )
        .bind(profile_id.as_uuid())
        .bind(visitor_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_stats())
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct StatsRow {
    view_count: i64,
    like_count: i64,
    is_liked: bool,
}

impl StatsRow {
    fn into_stats(self) -> ProfileStats {
        ProfileStats {
            view_count: self.view_count,
            like_count: self.like_count,
            is_liked: self.is_liked,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DriftRow {
    profile_id: Uuid,
    stored: i64,
    actual: i64,
}

impl DriftRow {
    fn into_drift(self) -> StatsDrift {
        StatsDrift {
            profile_id: ProfileId::from_uuid(self.profile_id),
            stored: self.stored,
            actual: self.actual,
        }
    }
}
