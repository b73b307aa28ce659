//! Error types for the Tonal catalogue client.
//!
//! Only caller-side preconditions surface as hard errors: calling a
//! user-scoped endpoint without a usable token, or a refresh attempt the
//! token endpoint rejects. Everything the server or network does to an
//! ordinary catalogue request is reported as data inside
//! [`Envelope`](crate::types::Envelope) so callers can branch uniformly.

use thiserror::Error;

/// Errors raised by the client façade and the token model.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A user-scoped call was made with no usable token: either no token is
    /// set, or the stored token is expired and carries no refresh token.
    /// No network request has been made when this is returned.
    #[error("authentication required: {0}")]
    AuthenticationRequired(&'static str),

    /// The token endpoint rejected a refresh attempt, or the refresh request
    /// never reached it. The stored token is left in place (still expired)
    /// so the caller can retry or force a re-login.
    #[error("token refresh failed: {}", .status.map_or_else(|| "transport error".to_string(), |s| format!("status {s}")))]
    TokenRefreshFailed {
        /// HTTP status of the rejection, `None` for transport failures.
        status: Option<u16>,
    },

    /// The token endpoint rejected an authorization-code exchange, or the
    /// exchange request never reached it.
    #[error("code exchange failed: {}", .status.map_or_else(|| "transport error".to_string(), |s| format!("status {s}")))]
    CodeExchangeFailed {
        /// HTTP status of the rejection, `None` for transport failures.
        status: Option<u16>,
    },

    /// A persisted or wire token form could not be decoded.
    #[error("invalid token data: {0}")]
    InvalidToken(String),
}

/// Convenience alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
