//! Application Configuration
//!
//! Configuration for the engagement application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;

use crate::domain::value_objects::DedupWindow;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Engagement application configuration
#[derive(Debug, Clone)]
pub struct EngagementConfig {
    /// Cookie holding the anonymous visitor id
    pub visitor_cookie_name: String,
    /// Visitor cookie lifetime
    pub visitor_cookie_max_age: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Repeat views inside this window are not recounted
    pub dedup_window: DedupWindow,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            visitor_cookie_name: "visitor_id".to_string(),
            visitor_cookie_max_age: Duration::from_secs(365 * 24 * 3600), // 1 year
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            dedup_window: DedupWindow::DEFAULT,
        }
    }
}

impl EngagementConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    pub fn with_dedup_window(self, window: Duration) -> Self {
        Self {
            dedup_window: DedupWindow::new(window),
            ..self
        }
    }

    /// Cookie attributes for the visitor id, scoped site-wide
    pub fn visitor_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.visitor_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age: Some(self.visitor_cookie_max_age),
        }
    }
}
