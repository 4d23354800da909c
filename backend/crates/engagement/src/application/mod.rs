//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod lookup;
pub mod read_stats;
pub mod reconcile_stats;
pub mod record_view;
pub mod toggle_like;
pub mod visitor_identity;

// Re-exports
pub use config::EngagementConfig;
pub use read_stats::ReadStatsUseCase;
pub use reconcile_stats::{ReconcileReport, ReconcileStatsUseCase};
pub use record_view::RecordViewUseCase;
pub use toggle_like::ToggleLikeUseCase;
pub use visitor_identity::{ResolvedVisitor, VisitorIdentity};
