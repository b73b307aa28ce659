//! # Tonal Integration Module
//!
//! This module is the SDK for the Tonal music catalogue Web API. It owns all
//! HTTP communication, the OAuth2 user-token lifecycle, authorization header
//! construction, compression negotiation, and response parsing. Everything
//! above it (CLI commands, the callback server) is a caller of the public
//! client surface defined here.
//!
//! ## Architecture
//!
//! ```text
//! Application layer (CLI, host apps)
//!          ↓
//! TonalClient façade
//!     ├── Token lifecycle (Absent / Valid / Expired, serialized refresh)
//!     ├── Headers (HMAC-signed anonymous, bearer user)
//!     ├── Encoding (gzip negotiation strategy)
//!     └── Payload parsing (array / named list / single item)
//!          ↓
//! HttpTransport (reqwest in production, mocks in tests)
//!          ↓
//! Tonal Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`client`] - The [`TonalClient`](client::TonalClient) façade: token
//!   state, serialized refresh, and the dispatch pipeline that turns every
//!   catalogue call into an [`Envelope`](crate::types::Envelope).
//! - [`auth`] - Authorize-URL construction and authorization-code exchange.
//! - [`transport`] - The network seam: request/response value types and the
//!   [`HttpTransport`](transport::HttpTransport) trait with its reqwest
//!   implementation.
//! - [`headers`] - Read-only header builders: HMAC-SHA256 signed scheme for
//!   anonymous calls, bearer scheme for user calls.
//! - [`encoding`] - Gzip handling as an injectable capability, with a manual
//!   decoder and a passthrough for transparently-negotiating transports.
//! - [`parse`] - The three payload-shape strategies endpoints select from.
//! - [`search`], [`releases`], [`charts`] - Catalogue endpoint methods as
//!   `impl TonalClient` blocks.
//!
//! ## Token Lifecycle
//!
//! A user token moves through `Absent → Valid → Expired` and back to `Valid`
//! via refresh. The rules the client enforces:
//!
//! 1. **Absent**: user-scoped calls fail immediately with an
//!    authentication-required error; no network request is made.
//! 2. **Valid**: calls proceed with a bearer header.
//! 3. **Expired**: the client refreshes first, using the stored refresh
//!    token plus the app credentials. Failure leaves the token untouched
//!    and fails the call; success replaces the token as a whole.
//!
//! Refreshes are serialized per client instance so concurrent callers that
//! all observe an expired token trigger a single token-endpoint request.
//!
//! ## Error Reporting
//!
//! Server and network outcomes are data: every catalogue method returns an
//! envelope carrying the parsed result, the HTTP status, and the response
//! headers. Only caller-side preconditions (no usable token) and rejected
//! token-endpoint requests surface as [`ApiError`](crate::error::ApiError).
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = TonalClient::new(config::client_config());
//! client.set_token(Some(stored_token)).await;
//!
//! let releases = client.new_releases(20).await?;
//! if let Some(items) = releases.result {
//!     for release in items {
//!         println!("{}", release.name);
//!     }
//! }
//! ```

pub mod auth;
pub mod charts;
pub mod client;
pub mod encoding;
pub mod headers;
pub mod parse;
pub mod releases;
pub mod search;
pub mod transport;
