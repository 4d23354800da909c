//! Visitor extraction
//!
//! Resolves the visitor identity for a request and carries the cookie that
//! must be written back when a new id was issued.

use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use platform::client::ClientInfo;
use platform::cookie::extract_cookie;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::EngagementConfig;
use crate::application::visitor_identity::{ResolvedVisitor, VisitorIdentity};
use crate::domain::value_objects::VisitorId;

/// Signed-in user id, inserted into request extensions by an upstream auth
/// layer. When present it is used as the visitor identity.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedViewer(pub Uuid);

/// Extractor yielding the resolved visitor for this request
#[derive(Debug, Clone)]
pub struct Visitor(pub ResolvedVisitor);

impl Visitor {
    pub fn id(&self) -> VisitorId {
        self.0.visitor_id
    }

    /// Attach the visitor cookie, if one was issued, to `response`
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Some(cookie) = &self.0.set_cookie {
            response
                .headers_mut()
                .append(header::SET_COOKIE, cookie.clone());
        }
        response
    }
}

impl<S> FromRequestParts<S> for Visitor
where
    Arc<EngagementConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = <Arc<EngagementConfig> as FromRef<S>>::from_ref(state);

        let authenticated = parts
            .extensions
            .get::<AuthenticatedViewer>()
            .map(|viewer| VisitorId::from_uuid(viewer.0));

        let cookie = extract_cookie(&parts.headers, &config.visitor_cookie_name);

        let resolved = VisitorIdentity::new(config).resolve(authenticated, cookie.as_deref());

        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        let client = ClientInfo::from_headers(&parts.headers, direct_ip);

        tracing::debug!(
            visitor_id = %resolved.visitor_id,
            source = resolved.source.as_str(),
            client_ip = ?client.ip,
            user_agent = client.user_agent.as_deref().unwrap_or("-"),
            "Visitor resolved"
        );

        Ok(Visitor(resolved))
    }
}
