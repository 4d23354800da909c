//! Unit tests for the engagement crate

#[cfg(test)]
mod fixtures {
    use chrono::{DateTime, Utc};
    use std::sync::Arc;

    use crate::application::{
        EngagementConfig, ReadStatsUseCase, RecordViewUseCase, ToggleLikeUseCase,
    };
    use crate::infra::memory::InMemoryEngagementRepository;

    pub const T0_MS: i64 = 1_700_000_000_000;
    pub const SECOND_MS: i64 = 1_000;
    pub const HOUR_MS: i64 = 3_600 * SECOND_MS;

    pub fn at(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
    }

    pub struct Harness {
        pub repo: Arc<InMemoryEngagementRepository>,
        pub views: RecordViewUseCase<InMemoryEngagementRepository, InMemoryEngagementRepository>,
        pub likes: ToggleLikeUseCase<InMemoryEngagementRepository, InMemoryEngagementRepository>,
        pub stats: ReadStatsUseCase<InMemoryEngagementRepository, InMemoryEngagementRepository>,
    }

    pub fn harness(usernames: &[&str]) -> Harness {
        let repo = Arc::new(InMemoryEngagementRepository::new());
        for name in usernames {
            repo.register_profile(name).unwrap();
        }
        let config = Arc::new(EngagementConfig::development());

        Harness {
            views: RecordViewUseCase::new(repo.clone(), repo.clone(), config),
            likes: ToggleLikeUseCase::new(repo.clone(), repo.clone()),
            stats: ReadStatsUseCase::new(repo.clone(), repo.clone()),
            repo,
        }
    }
}

#[cfg(test)]
mod view_tests {
    use super::fixtures::*;
    use crate::domain::value_objects::VisitorId;
    use crate::error::EngagementError;

    #[tokio::test]
    async fn test_first_view_counts_and_repeat_does_not() {
        let h = harness(&["alice"]);
        let v1 = VisitorId::new();

        let first = h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        assert!(first.counted);
        assert_eq!(first.view_count, 1);

        let repeat = h
            .views
            .execute_at("alice", v1, at(T0_MS + HOUR_MS))
            .await
            .unwrap();
        assert!(!repeat.counted);
        assert_eq!(repeat.view_count, 1);
    }

    #[tokio::test]
    async fn test_distinct_visitors_each_count() {
        let h = harness(&["alice"]);
        let (v1, v2) = (VisitorId::new(), VisitorId::new());

        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        let second = h.views.execute_at("alice", v2, at(T0_MS)).await.unwrap();

        assert!(second.counted);
        assert_eq!(second.view_count, 2);
    }

    #[tokio::test]
    async fn test_window_boundaries() {
        let h = harness(&["alice"]);
        let v1 = VisitorId::new();
        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();

        let just_inside = T0_MS + 24 * HOUR_MS - SECOND_MS;
        let outcome = h.views.execute_at("alice", v1, at(just_inside)).await.unwrap();
        assert!(!outcome.counted);

        // Exactly one window later is still a duplicate
        let exact = T0_MS + 24 * HOUR_MS;
        let outcome = h.views.execute_at("alice", v1, at(exact)).await.unwrap();
        assert!(!outcome.counted);

        let after = T0_MS + 24 * HOUR_MS + SECOND_MS;
        let outcome = h.views.execute_at("alice", v1, at(after)).await.unwrap();
        assert!(outcome.counted);
        assert_eq!(outcome.view_count, 2);
    }

    #[tokio::test]
    async fn test_window_measured_from_last_counted_view() {
        let h = harness(&["alice"]);
        let v1 = VisitorId::new();

        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        // Suppressed views do not extend the window
        h.views
            .execute_at("alice", v1, at(T0_MS + 23 * HOUR_MS))
            .await
            .unwrap();

        let outcome = h
            .views
            .execute_at("alice", v1, at(T0_MS + 25 * HOUR_MS))
            .await
            .unwrap();
        assert!(outcome.counted);
    }

    #[tokio::test]
    async fn test_username_is_canonicalized() {
        let h = harness(&["alice"]);
        let v1 = VisitorId::new();

        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        let outcome = h.views.execute_at(" ALICE ", v1, at(T0_MS)).await.unwrap();

        assert!(!outcome.counted);
        assert_eq!(outcome.view_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let h = harness(&["alice"]);

        let err = h
            .views
            .execute_at("nobody", VisitorId::new(), at(T0_MS))
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::ProfileNotFound));
    }

    #[tokio::test]
    async fn test_invalid_username_is_rejected() {
        let h = harness(&["alice"]);

        let err = h
            .views
            .execute_at("bad name!", VisitorId::new(), at(T0_MS))
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::InvalidUsername(_)));
    }

    #[tokio::test]
    async fn test_counted_view_appends_one_event() {
        let h = harness(&["alice"]);
        let profile_id = h.repo.register_profile("alice").unwrap();
        let v1 = VisitorId::new();

        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        h.views.execute_at("alice", v1, at(T0_MS + 1)).await.unwrap();

        assert_eq!(h.repo.view_event_count(profile_id).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_count_once() {
        let h = harness(&["alice"]);
        let views = std::sync::Arc::new(h.views);
        let v1 = VisitorId::new();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let views = views.clone();
            handles.push(tokio::spawn(async move {
                views.execute_at("alice", v1, at(T0_MS)).await
            }));
        }

        let mut counted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().counted {
                counted += 1;
            }
        }
        assert_eq!(counted, 1);

        let stats = h.stats.execute("alice", v1).await.unwrap();
        assert_eq!(stats.view_count, 1);
    }
}

#[cfg(test)]
mod like_tests {
    use super::fixtures::*;
    use crate::domain::value_objects::VisitorId;
    use crate::error::EngagementError;

    #[tokio::test]
    async fn test_toggle_like_flips_state() {
        let h = harness(&["alice"]);
        let v1 = VisitorId::new();

        let liked = h.likes.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        assert!(liked.liked);
        assert_eq!(liked.like_count, 1);

        let unliked = h.likes.execute_at("alice", v1, at(T0_MS)).await.unwrap();
        assert!(!unliked.liked);
        assert_eq!(unliked.like_count, 0);
    }

    #[tokio::test]
    async fn test_like_count_across_visitors() {
        let h = harness(&["alice"]);
        let (v1, v2) = (VisitorId::new(), VisitorId::new());

        h.likes.execute("alice", v1).await.unwrap();
        let both = h.likes.execute("alice", v2).await.unwrap();
        assert_eq!(both.like_count, 2);

        let one = h.likes.execute("alice", v1).await.unwrap();
        assert!(!one.liked);
        assert_eq!(one.like_count, 1);

        let stats = h.stats.execute("alice", v2).await.unwrap();
        assert!(stats.is_liked);
        assert_eq!(stats.like_count, 1);
    }

    #[tokio::test]
    async fn test_even_toggles_restore_state() {
        let h = harness(&["alice"]);
        let profile_id = h.repo.register_profile("alice").unwrap();
        let v1 = VisitorId::new();

        for _ in 0..4 {
            h.likes.execute("alice", v1).await.unwrap();
            assert!(h.repo.like_edge_count(profile_id, v1).unwrap() <= 1);
        }

        let stats = h.stats.execute("alice", v1).await.unwrap();
        assert!(!stats.is_liked);
        assert_eq!(stats.like_count, 0);
    }

    #[tokio::test]
    async fn test_like_count_never_negative() {
        let h = harness(&["alice"]);
        let v1 = VisitorId::new();

        for _ in 0..5 {
            let outcome = h.likes.execute("alice", v1).await.unwrap();
            assert!(outcome.like_count >= 0);
        }
        let stats = h.stats.execute("alice", v1).await.unwrap();
        assert!(stats.is_liked);
        assert_eq!(stats.like_count, 1);
    }

    #[tokio::test]
    async fn test_like_unknown_profile() {
        let h = harness(&["alice"]);
        let err = h.likes.execute("nobody", VisitorId::new()).await.unwrap_err();
        assert!(matches!(err, EngagementError::ProfileNotFound));
    }

    #[tokio::test]
    async fn test_likes_are_per_profile() {
        let h = harness(&["alice", "bob"]);
        let v1 = VisitorId::new();

        h.likes.execute("alice", v1).await.unwrap();

        let bob = h.stats.execute("bob", v1).await.unwrap();
        assert!(!bob.is_liked);
        assert_eq!(bob.like_count, 0);
    }
}

#[cfg(test)]
mod stats_tests {
    use super::fixtures::*;
    use crate::domain::value_objects::VisitorId;
    use crate::error::EngagementError;

    #[tokio::test]
    async fn test_fresh_profile_has_zero_stats() {
        let h = harness(&["alice"]);
        let stats = h.stats.execute("alice", VisitorId::new()).await.unwrap();

        assert_eq!(stats.view_count, 0);
        assert_eq!(stats.like_count, 0);
        assert!(!stats.is_liked);
    }

    #[tokio::test]
    async fn test_read_does_not_mutate() {
        let h = harness(&["alice"]);
        let profile_id = h.repo.register_profile("alice").unwrap();
        let v1 = VisitorId::new();
        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();

        let first = h.stats.execute("alice", v1).await.unwrap();
        let second = h.stats.execute("alice", v1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.repo.view_event_count(profile_id).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_is_liked_is_per_visitor() {
        let h = harness(&["alice"]);
        let (v1, v2) = (VisitorId::new(), VisitorId::new());
        h.likes.execute("alice", v1).await.unwrap();

        assert!(h.stats.execute("alice", v1).await.unwrap().is_liked);
        assert!(!h.stats.execute("alice", v2).await.unwrap().is_liked);
    }

    #[tokio::test]
    async fn test_stats_unknown_profile_is_error() {
        let h = harness(&["alice"]);
        let err = h.stats.execute("nobody", VisitorId::new()).await.unwrap_err();
        assert!(matches!(err, EngagementError::ProfileNotFound));
    }
}

#[cfg(test)]
mod reconcile_tests {
    use super::fixtures::*;
    use crate::application::ReconcileStatsUseCase;
    use crate::domain::value_objects::VisitorId;

    #[tokio::test]
    async fn test_reconcile_consistent_store() {
        let h = harness(&["alice"]);
        h.views
            .execute_at("alice", VisitorId::new(), at(T0_MS))
            .await
            .unwrap();

        let report = ReconcileStatsUseCase::new(h.repo.clone())
            .execute()
            .await
            .unwrap();
        assert!(report.is_consistent());
    }

    #[tokio::test]
    async fn test_reconcile_corrects_drift() {
        let h = harness(&["alice"]);
        let profile_id = h.repo.register_profile("alice").unwrap();
        let v1 = VisitorId::new();
        h.views.execute_at("alice", v1, at(T0_MS)).await.unwrap();

        h.repo.force_view_count(profile_id, 10);

        let use_case = ReconcileStatsUseCase::new(h.repo.clone());
        let report = use_case.execute().await.unwrap();
        assert_eq!(report.drifts.len(), 1);
        assert_eq!(report.drifts[0].profile_id, profile_id);
        assert_eq!(report.drifts[0].stored, 10);
        assert_eq!(report.drifts[0].actual, 1);
        assert_eq!(report.drifts[0].delta(), 9);

        let stats = h.stats.execute("alice", v1).await.unwrap();
        assert_eq!(stats.view_count, 1);

        assert!(use_case.execute().await.unwrap().is_consistent());
    }
}

#[cfg(test)]
mod models_tests {
    use crate::domain::entities::{LikeOutcome, ProfileStats, ViewOutcome};
    use crate::presentation::dto::*;

    #[test]
    fn test_view_response_serialization() {
        let response = ViewResponse::from(ViewOutcome {
            counted: true,
            view_count: 7,
        });
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"counted":true,"viewCount":7}"#);
    }

    #[test]
    fn test_like_response_serialization() {
        let response = LikeResponse::from(LikeOutcome {
            liked: false,
            like_count: 0,
        });
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"liked":false,"likeCount":0}"#);
    }

    #[test]
    fn test_stats_response_serialization() {
        let response = StatsResponse::from(ProfileStats {
            view_count: 3,
            like_count: 1,
            is_liked: true,
        });
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""viewCount":3"#));
        assert!(json.contains(r#""likeCount":1"#));
        assert!(json.contains(r#""isLiked":true"#));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(EngagementError, StatusCode)> = vec![
            (EngagementError::ProfileNotFound, StatusCode::NOT_FOUND),
            (
                EngagementError::InvalidUsername("empty".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                EngagementError::StoreUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                EngagementError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                EngagementError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_retryable_errors() {
        assert!(EngagementError::StoreUnavailable("down".into()).is_retryable());
        assert!(EngagementError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!EngagementError::ProfileNotFound.is_retryable());
        assert!(!EngagementError::Internal("boom".into()).is_retryable());
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let app_error = EngagementError::Internal("secret detail".into()).to_app_error();
        assert_eq!(app_error.kind(), ErrorKind::InternalServerError);
        assert!(!app_error.message().contains("secret"));

        let app_error = EngagementError::StoreUnavailable("host db-1".into()).to_app_error();
        assert!(!app_error.message().contains("db-1"));
        assert!(app_error.action().is_some());
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::application::EngagementConfig;
    use crate::infra::memory::InMemoryEngagementRepository;
    use crate::presentation::router::engagement_router_generic;
    use crate::presentation::visitor::AuthenticatedViewer;

    fn app() -> Router {
        let repo = InMemoryEngagementRepository::new();
        repo.register_profile("alice").unwrap();
        engagement_router_generic(repo, EngagementConfig::development())
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` pair of the response's Set-Cookie header
    fn issued_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn test_first_view_issues_visitor_cookie() {
        let response = app()
            .oneshot(request("POST", "/profiles/alice/views", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = issued_cookie(&response).expect("visitor cookie issued");
        assert!(cookie.starts_with("visitor_id="));

        let body = json(response).await;
        assert_eq!(body["counted"], true);
        assert_eq!(body["viewCount"], 1);
    }

    #[tokio::test]
    async fn test_returning_visitor_is_deduplicated() {
        let app = app();

        let first = app
            .clone()
            .oneshot(request("POST", "/profiles/alice/views", None))
            .await
            .unwrap();
        let cookie = issued_cookie(&first).unwrap();

        let second = app
            .clone()
            .oneshot(request("POST", "/profiles/alice/views", Some(&cookie)))
            .await
            .unwrap();
        assert!(second.headers().get(header::SET_COOKIE).is_none());

        let body = json(second).await;
        assert_eq!(body["counted"], false);
        assert_eq!(body["viewCount"], 1);
    }

    #[tokio::test]
    async fn test_like_then_stats() {
        let app = app();
        let cookie = format!("visitor_id={}", Uuid::new_v4());

        let like = app
            .clone()
            .oneshot(request("POST", "/profiles/alice/like", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(like.status(), StatusCode::OK);
        let body = json(like).await;
        assert_eq!(body["liked"], true);
        assert_eq!(body["likeCount"], 1);

        let stats = app
            .clone()
            .oneshot(request("GET", "/profiles/alice/stats", Some(&cookie)))
            .await
            .unwrap();
        let body = json(stats).await;
        assert_eq!(body["viewCount"], 0);
        assert_eq!(body["likeCount"], 1);
        assert_eq!(body["isLiked"], true);
    }

    #[tokio::test]
    async fn test_authenticated_viewer_overrides_cookie() {
        let app = app();
        let user = Uuid::new_v4();

        let mut req = request("POST", "/profiles/alice/like", None);
        req.extensions_mut().insert(AuthenticatedViewer(user));
        let response = app.clone().oneshot(req).await.unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        // A different cookie does not change who the signed-in viewer is
        let mut req = request(
            "GET",
            "/profiles/alice/stats",
            Some(&format!("visitor_id={}", Uuid::new_v4())),
        );
        req.extensions_mut().insert(AuthenticatedViewer(user));
        let body = json(app.clone().oneshot(req).await.unwrap()).await;
        assert_eq!(body["isLiked"], true);
    }

    #[tokio::test]
    async fn test_unknown_profile_returns_problem_json() {
        let response = app()
            .oneshot(request("GET", "/profiles/nobody/stats", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        // The visitor id is still issued on error responses
        assert!(issued_cookie(&response).is_some());

        let body = json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Not Found");
    }

    #[tokio::test]
    async fn test_invalid_username_is_bad_request() {
        let response = app()
            .oneshot(request("POST", "/profiles/bad%20name/views", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
