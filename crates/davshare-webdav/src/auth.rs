//! HTTP Basic authentication in front of the DAV handler.
//!
//! Every request must carry an `Authorization: Basic ...` header whose pair is
//! accepted by the [`AuthGate`]. Anything else is answered with
//! `401 Unauthorized` and a challenge naming the gate's realm, before the
//! request reaches the filesystem.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dav_server::body::Body;
use davshare_core::AuthGate;
use hyper::header::{AUTHORIZATION, HeaderMap, HeaderValue, WWW_AUTHENTICATE};
use hyper::{Response, StatusCode};
use std::fmt;

/// Username and secret presented with one request.
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Extracts Basic credentials from request headers.
///
/// Returns `None` if the header is missing, uses another scheme, or is not
/// valid base64-encoded `user:secret` text.
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, secret) = decoded.split_once(':')?;
    Some(Credentials {
        username: username.to_string(),
        secret: secret.to_string(),
    })
}

/// Returns true if the request carries credentials the gate accepts.
pub(crate) fn is_authorized(gate: &AuthGate, headers: &HeaderMap) -> bool {
    basic_credentials(headers)
        .is_some_and(|credentials| gate.authenticate(&credentials.username, &credentials.secret))
}

/// Builds the `401 Unauthorized` challenge for `realm`.
pub fn unauthorized_response(realm: &str) -> Response<Body> {
    let realm: String = realm.chars().filter(|c| *c != '"' && *c != '\\').collect();
    let mut response = Response::new(Body::from("401 Unauthorized\n".to_string()));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    if let Ok(challenge) = HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")) {
        response.headers_mut().insert(WWW_AUTHENTICATE, challenge);
    }
    response
}
