//! Login tokens for the WebSocket handshake.
//!
//! A session URL carries three query parameters:
//! - `user`: the login name
//! - `time`: unix expiry timestamp of the session
//! - `token`: lowercase hex SHA-256 over `user + time + secret`
//!
//! Client and server derive the token independently from a shared
//! secret, so the handshake needs no extra round trip. The server also
//! re-checks `time` on every inbound frame and drops expired sessions.

use sha2::{Digest, Sha256};
use url::Url;

use crate::error::{AuthError, ProtocolError};

/// An authenticated session identity, as recovered from the connect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub user: String,
    /// Unix timestamp after which the session is invalid.
    pub expires: i64,
}

impl Login {
    pub fn expired(&self, now_unix: i64) -> bool {
        self.expires <= now_unix
    }
}

/// Derive the token for one user and expiry.
pub fn login_token(user: &str, expires_unix: i64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user.as_bytes());
    hasher.update(expires_unix.to_string().as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build a connect URL: `base` plus `user`/`time`/`token` query pairs.
///
/// `ttl_secs` is added to `now_unix` to form the expiry.
pub fn session_url(
    base: &str,
    user: &str,
    secret: &str,
    ttl_secs: i64,
    now_unix: i64,
) -> Result<Url, ProtocolError> {
    let mut url = Url::parse(base)?;
    let expires = now_unix + ttl_secs;
    url.query_pairs_mut()
        .append_pair("user", user)
        .append_pair("time", &expires.to_string())
        .append_pair("token", &login_token(user, expires, secret));
    Ok(url)
}

/// Verify the query string of a handshake request.
pub fn verify_query(query: &str, secret: &str, now_unix: i64) -> Result<Login, AuthError> {
    let mut user = None;
    let mut time = None;
    let mut token = None;
    for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
        match k.as_ref() {
            "user" => user = Some(v.into_owned()),
            "time" => time = Some(v.into_owned()),
            "token" => token = Some(v.into_owned()),
            _ => {}
        }
    }
    let user = user.ok_or(AuthError::MissingParam("user"))?;
    let time = time.ok_or(AuthError::MissingParam("time"))?;
    let token = token.ok_or(AuthError::MissingParam("token"))?;

    let expires: i64 = time.parse().map_err(|_| AuthError::BadTimestamp)?;
    if token != login_token(&user, expires, secret) {
        return Err(AuthError::BadToken(user));
    }
    let login = Login { user, expires };
    if login.expired(now_unix) {
        return Err(AuthError::Expired(login.user));
    }
    Ok(login)
}
