//! Profile Engagement Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers
//!
//! ## Counting Model
//! - A view is counted at most once per (profile, visitor) per rolling dedup window
//! - Likes are a set of (profile, visitor) edges; the count is always derived from it
//! - Every mutation is a single atomic store operation, safe under concurrent requests
//! - Visitors are identified by the signed-in user id, else an HttpOnly cookie

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::EngagementConfig;
pub use application::reconcile_stats::{ReconcileReport, ReconcileStatsUseCase};
pub use error::{EngagementError, EngagementResult};
pub use infra::memory::InMemoryEngagementRepository;
pub use infra::postgres::PgEngagementRepository;
pub use presentation::router::{engagement_router, engagement_router_generic};
pub use presentation::visitor::AuthenticatedViewer;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
