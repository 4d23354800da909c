//! Visitor Identity
//!
//! Read-or-create of the anonymous visitor id. Never fails: at worst a new
//! id is issued, which only costs dedup accuracy.

use std::sync::Arc;

use axum::http::HeaderValue;

use crate::application::config::EngagementConfig;
use crate::domain::services::resolve_visitor;
use crate::domain::value_objects::{VisitorId, VisitorSource};

#[derive(Debug, Clone)]
pub struct ResolvedVisitor {
    pub visitor_id: VisitorId,
    pub source: VisitorSource,
    /// `Set-Cookie` value to attach to the response, present only when a
    /// new id was issued
    pub set_cookie: Option<HeaderValue>,
}

pub struct VisitorIdentity {
    config: Arc<EngagementConfig>,
}

impl VisitorIdentity {
    pub fn new(config: Arc<EngagementConfig>) -> Self {
        Self { config }
    }

    /// Resolve the visitor for one request.
    ///
    /// `authenticated` is the signed-in user id when an upstream auth layer
    /// supplied one; `cookie_value` is the raw visitor cookie, if sent.
    pub fn resolve(
        &self,
        authenticated: Option<VisitorId>,
        cookie_value: Option<&str>,
    ) -> ResolvedVisitor {
        let (visitor_id, source) = resolve_visitor(authenticated, cookie_value);

        let set_cookie = match source {
            VisitorSource::Issued => {
                if cookie_value.is_some() {
                    tracing::debug!("Replacing malformed visitor cookie");
                }
                match self
                    .config
                    .visitor_cookie()
                    .build_set_cookie(&visitor_id.to_string())
                {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not build visitor cookie");
                        None
                    }
                }
            }
            VisitorSource::Authenticated | VisitorSource::Cookie => None,
        };

        ResolvedVisitor {
            visitor_id,
            source,
            set_cookie,
        }
    }
}
