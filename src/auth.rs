//! Password hashing and session handling.
//!
//! Identity is carried by an opaque session token in a cookie and resolved
//! per request against the sessions table; no identity lives in
//! process-wide state.

use anyhow::{Context, Result};
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Cookie that carries the session token.
pub const SESSION_COOKIE: &str = "session_token";

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("Failed to hash password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}

/// Mint a fresh opaque session token.
pub fn new_session_token() -> String {
    Uuid::new_v4().to_string()
}

pub fn session_expiry(ttl_minutes: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(ttl_minutes)
}

/// Extract the session token from a request's Cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    parse_cookie(cookies, SESSION_COOKIE)
}

fn parse_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

/// Set-Cookie value that installs the session token.
///
/// The frontend calls from another origin, so the cookie needs
/// SameSite=None, which in turn requires Secure.
pub fn session_cookie(token: &str, ttl_minutes: i64) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE,
        token,
        ttl_minutes * 60
    )
}

/// Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE
    )
}
