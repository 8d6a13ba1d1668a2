//! Credential extraction from the inbound request.

use std::fmt;

use axum::http::{header, HeaderMap};

/// Opaque bearer token owned by the caller's session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token. Blank input is not a credential.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == raw.len() {
            Some(Self(raw))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Read the caller's credential from the request headers.
///
/// `Authorization: Bearer <t>` and the legacy `Authorization: JWT <t>` are
/// equivalent. Without a usable header, the session cookie is consulted.
/// Never fails: an anonymous caller yields `None`.
pub fn access_token(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    from_authorization(headers).or_else(|| from_cookie(headers, cookie_name))
}

fn from_authorization(headers: &HeaderMap) -> Option<Credential> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("jwt") {
        Credential::new(token)
    } else {
        None
    }
}

fn from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Credential::new(value.trim_matches('"')))
}
