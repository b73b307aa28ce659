//! # CLI Module
//!
//! This module provides the command-line interface layer of tonalcli. It
//! implements the user-facing commands and coordinates between the SDK
//! client, token persistence, and terminal presentation.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Runs the OAuth authorization-code flow: local callback
//!   server, browser handoff, code exchange, token persistence
//! - [`logout`] - Removes the cached token
//! - [`token_info`] - Shows the cached token's state and expiry
//!
//! ### Catalogue Queries
//!
//! - [`search`] / [`similar`] - Artist search and similar-artist lookup
//! - [`releases`] / [`release`] - New-release listing and single-release lookup
//! - [`charts`] / [`genres`] - Top-artist chart and genre directory
//! - [`favourites`] - The signed-in user's saved releases (requires auth)
//!
//! All catalogue commands construct one SDK client, seed it with the cached
//! token when present, and report failures out of the returned envelope
//! rather than crashing: HTTP errors print a status line, transport errors
//! a network line. Only missing authentication aborts with guidance to run
//! `tonalcli auth`.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config, management::TokenCache, tonal::client::TonalClient, types::Envelope};

mod auth;
mod charts;
mod releases;
mod search;

pub use auth::auth;
pub use auth::logout;
pub use auth::token_info;
pub use charts::charts;
pub use charts::favourites;
pub use charts::genres;
pub use releases::release;
pub use releases::releases;
pub use search::search;
pub use search::similar;

/// Build an SDK client and seed it with the cached token, if any.
pub(crate) async fn client_with_cached_token() -> TonalClient {
    let client = TonalClient::new(config::client_config());
    if let Ok(cache) = TokenCache::load().await {
        client.set_token(Some(cache.into_token())).await;
    }
    client
}

/// Standard spinner used while a catalogue request is in flight.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// One-line description of a failed envelope for terminal output.
pub(crate) fn failure_summary<T>(envelope: &Envelope<T>) -> String {
    let message = envelope.error_message.as_deref().unwrap_or("unknown error");
    match envelope.status {
        Some(status) => format!("HTTP {status}: {message}"),
        None => format!("network error: {message}"),
    }
}
