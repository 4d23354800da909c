//! Cookie Management Infrastructure
//!
//! Building `Set-Cookie` values and reading cookies back from a request.

use axum::http::{HeaderMap, HeaderValue, header};
use std::time::Duration;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Error building a cookie header
#[derive(Debug, Clone, thiserror::Error)]
pub enum CookieError {
    #[error("Invalid cookie name: {0}")]
    InvalidName(String),

    #[error("Invalid cookie value for {0}")]
    InvalidValue(String),
}

/// Cookie attributes
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Option<Duration>,
}

impl CookieConfig {
    /// Build the `Set-Cookie` header value
    ///
    /// `SameSite=None` forces `Secure`, browsers drop the cookie otherwise.
    pub fn build_set_cookie(&self, value: &str) -> Result<HeaderValue, CookieError> {
        if !is_token(&self.name) {
            return Err(CookieError::InvalidName(self.name.clone()));
        }
        if !value.bytes().all(is_cookie_octet) {
            return Err(CookieError::InvalidValue(self.name.clone()));
        }

        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure || self.same_site == SameSite::None {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=");
        cookie.push_str(self.same_site.as_str());
        cookie.push_str("; Path=");
        cookie.push_str(&self.path);

        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }

        HeaderValue::from_str(&cookie).map_err(|_| CookieError::InvalidValue(self.name.clone()))
    }
}

/// Extract a cookie value from headers
///
/// Looks through every `Cookie` header; the first matching pair wins.
/// Surrounding double quotes are stripped.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            if key.trim() != name {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some(value.to_string())
        })
}

fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

// RFC 6265 cookie-octet
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}
