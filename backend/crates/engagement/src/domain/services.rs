//! Domain Services
//!
//! Pure decisions shared by every store implementation.

use crate::domain::value_objects::{DedupWindow, VisitorId, VisitorSource};

/// Decide whether a view at `now_ms` is counted.
///
/// `last_counted_at_ms` is the time of the last counted view for the same
/// (profile, visitor) pair, if any.
pub fn should_count_view(
    last_counted_at_ms: Option<i64>,
    now_ms: i64,
    window: DedupWindow,
) -> bool {
    match last_counted_at_ms {
        Some(last) => !window.is_duplicate(last, now_ms),
        None => true,
    }
}

/// Pick the visitor identity for a request.
///
/// A signed-in user id wins over the cookie. A cookie that does not parse as
/// a UUID is treated as absent and replaced by a fresh id.
pub fn resolve_visitor(
    authenticated: Option<VisitorId>,
    cookie_value: Option<&str>,
) -> (VisitorId, VisitorSource) {
    if let Some(id) = authenticated {
        return (id, VisitorSource::Authenticated);
    }

    match cookie_value.and_then(|v| v.trim().parse::<VisitorId>().ok()) {
        Some(id) => (id, VisitorSource::Cookie),
        None => (VisitorId::new(), VisitorSource::Issued),
    }
}
