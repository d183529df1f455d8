//! Session gate.
//!
//! There is exactly one operator account: a shared password compared at
//! login, and a fixed-value session cookie asserted on every later
//! request. No server-side session table exists — possession of the
//! cookie value is the whole credential, bounded by the cookie's own
//! 24-hour max-age.

use axum::http::{HeaderMap, header};
use subtle::ConstantTimeEq;

/// The literal cookie value asserted by a logged-in session.
pub const SESSION_TOKEN: &str = "logged_in";

/// Session cookie lifetime in seconds (24 hours).
const COOKIE_MAX_AGE: u32 = 86_400;

/// Substrings of `User-Agent` values that mark a request as coming from a
/// browser rather than the client app.
const BROWSER_TOKENS: &[&str] = &["Mozilla", "Chrome", "Safari", "Firefox", "Edg", "OPR"];

/// Authorizes administrative requests against the fixed admin credential.
#[derive(Clone)]
pub struct SessionGate {
    password: String,
    cookie_name: String,
}

impl SessionGate {
    #[must_use]
    pub fn new(password: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            cookie_name: cookie_name.into(),
        }
    }

    /// Compare a submitted password against the configured secret in
    /// constant time.
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into()
    }

    /// The `Set-Cookie` value issued after a successful login.
    #[must_use]
    pub fn login_cookie(&self) -> String {
        format!(
            "{}={SESSION_TOKEN}; HttpOnly; Path=/; Max-Age={COOKIE_MAX_AGE}",
            self.cookie_name
        )
    }

    /// Whether the request carries the logged-in cookie.
    ///
    /// This is a substring match on the `Cookie` header, not a structured
    /// parse: the token is accepted wherever it appears among other
    /// cookies. That looseness is inherited behavior the client side
    /// depends on.
    #[must_use]
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let needle = format!("{}={SESSION_TOKEN}", self.cookie_name);
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|cookies| cookies.contains(&needle))
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}

/// Whether a request looks browser-originated.
///
/// True when the user-agent carries a known browser token or when the
/// request has a `Sec-Fetch-Mode` hint (browsers attach it, HTTP client
/// libraries do not). Used only to decide whether the raw JSON export is
/// withheld from unauthenticated browsers.
#[must_use]
pub fn is_browser(headers: &HeaderMap) -> bool {
    if headers.contains_key("sec-fetch-mode") {
        return true;
    }
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| BROWSER_TOKENS.iter().any(|token| ua.contains(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn gate() -> SessionGate {
        SessionGate::new("hunter2", "admin_session")
    }

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn password_check_is_exact() {
        let gate = gate();
        assert!(gate.verify_password("hunter2"));
        assert!(!gate.verify_password("hunter"));
        assert!(!gate.verify_password("hunter22"));
        assert!(!gate.verify_password(""));
    }

    #[test]
    fn cookie_grants_access_among_other_cookies() {
        let gate = gate();
        let headers = headers_with("cookie", "theme=dark; admin_session=logged_in; lang=en");
        assert!(gate.is_authorized(&headers));
    }

    #[test]
    fn wrong_or_missing_cookie_is_rejected() {
        let gate = gate();
        assert!(!gate.is_authorized(&HeaderMap::new()));
        let headers = headers_with("cookie", "admin_session=expired");
        assert!(!gate.is_authorized(&headers));
    }

    #[test]
    fn login_cookie_carries_the_expected_attributes() {
        let cookie = gate().login_cookie();
        assert_eq!(
            cookie,
            "admin_session=logged_in; HttpOnly; Path=/; Max-Age=86400"
        );
    }

    #[test]
    fn browser_user_agents_are_classified() {
        let headers = headers_with(
            "user-agent",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
        );
        assert!(is_browser(&headers));

        let headers = headers_with("user-agent", "okhttp/4.9.0");
        assert!(!is_browser(&headers));
    }

    #[test]
    fn fetch_metadata_hint_marks_a_browser() {
        let headers = headers_with("sec-fetch-mode", "navigate");
        assert!(is_browser(&headers));
    }
}
