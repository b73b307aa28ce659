//! Authorization header construction.
//!
//! Two schemes exist, mirroring the API's two access levels:
//!
//! - anonymous catalogue calls carry an HMAC-signed header derived from the
//!   application credentials and per-request metadata;
//! - user-scoped calls carry a bearer header with the current access token.
//!
//! Both builders are read-only projections: they never touch token state.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::NaiveDateTime;
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;

use crate::{
    error::ApiError,
    types::{TokenState, UserToken},
};

type HmacSha256 = Hmac<Sha256>;

/// Application credentials issued when registering with the API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

/// Random alphanumeric nonce for signed requests.
pub fn generate_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Build the signed `Authorization` header for an anonymous call.
///
/// The canonical request string is
/// `METHOD\npath\napp_id\ntimestamp\nnonce` (the path excludes the query
/// string), signed with HMAC-SHA256 under the app secret and base64-encoded.
/// Identical inputs produce an identical header, so signatures can be
/// compared in tests and by any verifying proxy.
pub fn signed(
    credentials: &Credentials,
    method: &str,
    path: &str,
    timestamp: i64,
    nonce: &str,
) -> Vec<(String, String)> {
    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}",
        method.to_ascii_uppercase(),
        path,
        credentials.app_id,
        timestamp,
        nonce,
    );

    // HMAC accepts keys of any length; new_from_slice cannot fail.
    let mut mac = HmacSha256::new_from_slice(credentials.app_secret.as_bytes())
        .expect("HMAC key of any length is accepted");
    mac.update(canonical.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    vec![(
        "Authorization".to_string(),
        format!(
            "TONAL-HMAC-SHA256 app_id=\"{}\", ts=\"{}\", nonce=\"{}\", sig=\"{}\"",
            credentials.app_id, timestamp, nonce, signature,
        ),
    )]
}

/// Build the bearer `Authorization` header for a user-scoped call.
///
/// Requires a token that is Valid at `now`; an absent or expired token is an
/// authentication-required condition for the caller to handle (typically by
/// refreshing first).
pub fn bearer(
    token: Option<&UserToken>,
    now: NaiveDateTime,
) -> Result<Vec<(String, String)>, ApiError> {
    let Some(token) = token else {
        return Err(ApiError::AuthenticationRequired("no token set"));
    };
    if token.state_at(now) != TokenState::Valid {
        return Err(ApiError::AuthenticationRequired("token expired"));
    }

    Ok(vec![(
        "Authorization".to_string(),
        format!("Bearer {}", token.access_token),
    )])
}
