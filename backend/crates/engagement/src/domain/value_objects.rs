//! Domain Value Objects
//!
//! Immutable value types for the engagement domain.

use std::fmt;
use std::time::Duration;
use unicode_normalization::UnicodeNormalization;

use crate::error::{EngagementError, EngagementResult};

pub use kernel::id::{ProfileId, VisitorId};

pub const USERNAME_MAX_LENGTH: usize = 64;

/// Canonical profile username
///
/// Input is trimmed, NFKC-normalized and lower-cased before validation, so
/// `" Alice "` and `"alice"` address the same profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> EngagementResult<Self> {
        let canonical: String = raw.trim().nfkc().collect::<String>().to_lowercase();

        if canonical.is_empty() {
            return Err(EngagementError::InvalidUsername(
                "username is empty".to_string(),
            ));
        }
        if canonical.chars().count() > USERNAME_MAX_LENGTH {
            return Err(EngagementError::InvalidUsername(format!(
                "username exceeds {USERNAME_MAX_LENGTH} characters"
            )));
        }
        if let Some(c) = canonical
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')))
        {
            return Err(EngagementError::InvalidUsername(format!(
                "unexpected character {c:?}"
            )));
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rolling window during which repeat views are not recounted
///
/// Measured from the last *counted* view. A view exactly `window` after the
/// last counted one is still a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupWindow(Duration);

impl DedupWindow {
    pub const DEFAULT: DedupWindow = DedupWindow(Duration::from_secs(24 * 3600));

    pub fn new(window: Duration) -> Self {
        Self(window)
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        i64::try_from(self.0.as_millis()).unwrap_or(i64::MAX)
    }

    /// Oldest `last_counted_at_ms` that still suppresses a view at `now_ms`.
    ///
    /// A view counts iff `last_counted_at_ms < cutoff_ms(now_ms)`.
    pub fn cutoff_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.as_millis())
    }

    pub fn is_duplicate(&self, last_counted_at_ms: i64, now_ms: i64) -> bool {
        last_counted_at_ms >= self.cutoff_ms(now_ms)
    }
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where a request's visitor identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorSource {
    /// Signed-in user id supplied by an upstream auth layer
    Authenticated,
    /// Previously issued cookie sent back by the browser
    Cookie,
    /// Freshly generated on this request
    Issued,
}

impl VisitorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorSource::Authenticated => "authenticated",
            VisitorSource::Cookie => "cookie",
            VisitorSource::Issued => "issued",
        }
    }
}
