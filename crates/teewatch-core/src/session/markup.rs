//! Scraping helpers for the login exchange.
//!
//! The site exposes no API for logging in, so the session id and the form's
//! anti-forgery token are pulled out of headers and HTML here and nowhere
//! else.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AuthError;

/// Cookie that carries the server-side session.
pub const SESSION_COOKIE: &str = "PHPSESSID";

/// Name of the hidden input holding the anti-forgery token.
pub const TOKEN_FIELD: &str = "login_form[_token]";

static SESSION_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;\s])PHPSESSID=([0-9A-Za-z]+)(?:;|$)").expect("static regex")
});

static INPUT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("static regex"));

static VALUE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bvalue\s*=\s*"([^"]*)""#).expect("static regex"));

/// Find the session id among `set-cookie` header values.
pub fn extract_session_id<S: AsRef<str>>(set_cookies: &[S]) -> Result<String, AuthError> {
    set_cookies
        .iter()
        .find_map(|header| {
            SESSION_ID_RE
                .captures(header.as_ref())
                .map(|c| c[1].to_string())
        })
        .ok_or(AuthError::MissingSessionId)
}

/// Find the `value` of the input named [`TOKEN_FIELD`].
pub fn extract_form_token(html: &str) -> Result<String, AuthError> {
    let name_attr = format!(r#"name="{TOKEN_FIELD}""#);

    INPUT_TAG_RE
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| tag.contains(&name_attr))
        .find_map(|tag| VALUE_ATTR_RE.captures(tag).map(|c| c[1].to_string()))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MissingFormToken {
            field: TOKEN_FIELD.to_string(),
        })
}

/// Join the session id with the cookies set by the credential submission
/// into one `cookie` header value.
///
/// Cookie attributes (`path`, `HttpOnly`, ...) are dropped. A re-issued
/// session id replaces the original one in place.
pub fn combine_cookies<S: AsRef<str>>(session_id: &str, set_cookies: &[S]) -> String {
    let mut pairs: Vec<(String, String)> = vec![(SESSION_COOKIE.to_string(), session_id.to_string())];

    for header in set_cookies {
        let Some(pair) = header.as_ref().split(';').next() else {
            continue;
        };
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            continue;
        }

        match pairs.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => pairs.push((name.to_string(), value.to_string())),
        }
    }

    pairs
        .into_iter()
        .map(|(n, v)| format!("{n}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}
