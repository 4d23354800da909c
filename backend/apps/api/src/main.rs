//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! engagement crate.

mod config;

use axum::{
    Router, http,
    http::{Method, header},
    routing::get,
};
use engagement::domain::repository::ViewRepository;
use engagement::{
    InMemoryEngagementRepository, PgEngagementRepository, ReconcileStatsUseCase,
    engagement_router, engagement_router_generic,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,engagement=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let engagement_config = config.engagement();

    let engagement = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let store = PgEngagementRepository::new(pool);

            // Startup cleanup: stale dedup marks never suppress a view again.
            // Errors here should not prevent server startup
            match store
                .cleanup_stale_marks(engagement_config.dedup_window)
                .await
            {
                Ok(deleted) => {
                    tracing::info!(marks_deleted = deleted, "View mark cleanup completed");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "View mark cleanup failed, continuing anyway"
                    );
                }
            }

            reconcile_at_startup(Arc::new(store.clone())).await;

            engagement_router(store, engagement_config)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, counters are kept in memory only");

            let store = InMemoryEngagementRepository::new();
            for username in &config.seed_profiles {
                match store.register_profile(username) {
                    Ok(profile_id) => {
                        tracing::info!(username = %username, profile_id = %profile_id, "Seeded profile");
                    }
                    Err(e) => {
                        tracing::warn!(username = %username, error = %e, "Skipping seed profile");
                    }
                }
            }

            reconcile_at_startup(Arc::new(store.clone())).await;

            engagement_router_generic(store, engagement_config)
        }
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/engagement", engagement)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Rebuild drifted view counters. Errors here should not prevent server startup.
async fn reconcile_at_startup<V: ViewRepository>(store: Arc<V>) {
    match ReconcileStatsUseCase::new(store).execute().await {
        Ok(report) if report.is_consistent() => {
            tracing::info!("View counters consistent");
        }
        Ok(report) => {
            tracing::warn!(
                corrected = report.drifts.len(),
                "View counters were out of sync and have been corrected"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "View counter reconciliation failed, continuing anyway"
            );
        }
    }
}
