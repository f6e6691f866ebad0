// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session cookies and credential extraction.

use axum::http::{header, HeaderMap};
use cardgate_core::Credentials;

/// Cookie name prefix that browsers only accept over HTTPS.
pub const SECURE_PREFIX: &str = "__Secure-";

/// Session cookie names, most specific first.
pub const DEFAULT_COOKIE_NAMES: &[&str] = &[
    "__Secure-next-auth.session-token",
    "next-auth.session-token",
];

// =============================================================================
// SessionCookies
// =============================================================================

/// Reads, issues and expires the portal's session cookies.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    names: Vec<String>,
    max_age_secs: i64,
    secure: bool,
}

impl SessionCookies {
    /// Creates a cookie set searched in the given order.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n: &String| !n.trim().is_empty())
            .collect();

        Self {
            names,
            max_age_secs: 30 * 24 * 60 * 60,
            secure: false,
        }
    }

    /// Sets the lifetime of issued cookies.
    pub fn with_max_age(mut self, secs: i64) -> Self {
        self.max_age_secs = secs;
        self
    }

    /// Marks issued cookies `Secure`.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Pulls the session credential out of a request.
    ///
    /// Cookies are checked in configured order, then `Authorization: Bearer`.
    /// Empty values are skipped.
    pub fn extract(&self, headers: &HeaderMap) -> Credentials {
        for name in &self.names {
            if let Some(value) = find_cookie(headers, name) {
                let credentials = Credentials::from_cookie(name.as_str(), value);
                if !credentials.is_empty() {
                    return credentials;
                }
            }
        }

        match bearer_token(headers) {
            Some(token) => Credentials::from_bearer(token),
            None => Credentials::none(),
        }
    }

    /// Name used when issuing a cookie.
    ///
    /// `__Secure-` names are only usable over HTTPS, so they are skipped
    /// unless cookies are marked secure.
    pub fn issue_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.starts_with(SECURE_PREFIX) == self.secure)
            .or_else(|| self.names.iter().find(|n| !n.starts_with(SECURE_PREFIX)))
            .map(String::as_str)
    }

    /// `Set-Cookie` value carrying a new session token.
    pub fn issue(&self, token: &str) -> Option<String> {
        let name = self.issue_name()?;
        Some(self.render(name, token, self.max_age_secs))
    }

    /// `Set-Cookie` values expiring every session cookie.
    pub fn expire_all(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|name| self.render(name, "", 0))
            .collect()
    }

    fn render(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{name}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
        if self.secure || name.starts_with(SECURE_PREFIX) {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl Default for SessionCookies {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAMES.iter().copied())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Finds a cookie value across all `Cookie` headers.
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use cardgate_core::CredentialSource;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_cookie_order() {
        let cookies = SessionCookies::default();
        let map = headers(&[(
            header::COOKIE,
            "theme=dark; next-auth.session-token=plain; __Secure-next-auth.session-token=secure",
        )]);

        let creds = cookies.extract(&map);
        assert_eq!(creds.token(), Some("secure"));
        assert_eq!(
            creds.source(),
            Some(&CredentialSource::Cookie("__Secure-next-auth.session-token".to_string()))
        );
    }

    #[test]
    fn test_empty_cookie_falls_through() {
        let cookies = SessionCookies::default();
        let map = headers(&[
            (header::COOKIE, "__Secure-next-auth.session-token=; next-auth.session-token=abc"),
            (header::AUTHORIZATION, "Bearer ignored"),
        ]);

        assert_eq!(cookies.extract(&map).token(), Some("abc"));
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let cookies = SessionCookies::default();
        let map = headers(&[
            (header::COOKIE, "a=1"),
            (header::COOKIE, "next-auth.session-token=second"),
        ]);

        assert_eq!(cookies.extract(&map).token(), Some("second"));
    }

    #[test]
    fn test_bearer_fallback() {
        let cookies = SessionCookies::default();

        let map = headers(&[(header::AUTHORIZATION, "Bearer mytoken123")]);
        let creds = cookies.extract(&map);
        assert_eq!(creds.token(), Some("mytoken123"));
        assert_eq!(creds.source(), Some(&CredentialSource::Bearer));

        let map = headers(&[(header::AUTHORIZATION, "Basic abc")]);
        assert!(cookies.extract(&map).is_empty());

        let map = headers(&[(header::AUTHORIZATION, "Bearer ")]);
        assert!(cookies.extract(&map).is_empty());

        assert!(cookies.extract(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_issue_name() {
        let cookies = SessionCookies::default();
        assert_eq!(cookies.issue_name(), Some("next-auth.session-token"));

        let cookies = SessionCookies::default().with_secure(true);
        assert_eq!(cookies.issue_name(), Some("__Secure-next-auth.session-token"));

        let cookies = SessionCookies::new(["__Secure-only"]);
        assert_eq!(cookies.issue_name(), None);
        assert!(cookies.issue("t").is_none());
    }

    #[test]
    fn test_issue_cookie() {
        let cookies = SessionCookies::default().with_max_age(60);
        assert_eq!(
            cookies.issue("tok").unwrap(),
            "next-auth.session-token=tok; Path=/; Max-Age=60; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_expire_all() {
        let expired = SessionCookies::default().expire_all();
        assert_eq!(expired.len(), 2);
        assert!(expired[0].starts_with("__Secure-next-auth.session-token=; "));
        assert!(expired[0].ends_with("; Secure"));
        assert!(expired.iter().all(|c| c.contains("Max-Age=0")));
    }
}
