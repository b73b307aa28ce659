//! # API Module
//!
//! HTTP endpoints for the temporary local server the CLI runs during the
//! OAuth flow.
//!
//! - [`callback`] - Receives the redirect from the Tonal authorization page
//!   and completes the flow by exchanging the authorization code for a user
//!   token through the SDK client.
//! - [`health`] - Health check returning name and version, handy to verify
//!   the callback server actually came up on the configured address.
//!
//! Both endpoints are implemented as [Axum](https://docs.rs/axum) async
//! handlers and wired up by [`crate::server::start_api_server`]. The server
//! only lives for the duration of an `auth` command; nothing here is part
//! of the SDK surface.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
