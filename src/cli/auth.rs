use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config, error, info,
    management::TokenCache,
    server::start_api_server,
    success,
    tonal::client::TonalClient,
    types::{TokenState, UserToken},
    warning,
};

/// Runs the OAuth 2.0 authorization-code flow against the Tonal accounts
/// service.
///
/// This function orchestrates the whole host-side flow:
/// 1. Starting a local callback server
/// 2. Opening the authorization URL in the user's browser
/// 3. Waiting for the callback handler to exchange the code
/// 4. Persisting the obtained token for future use
///
/// The code exchange itself (including the client secret) happens in the
/// SDK client; this layer only moves the user through the consent page and
/// stores the result.
///
/// # Arguments
///
/// * `shared_state` - Thread-safe slot the callback handler deposits the
///   exchanged token into
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - Token persistence failures terminate the program with an error
/// - Authentication timeouts or failures terminate with an error message
pub async fn auth(shared_state: Arc<Mutex<Option<UserToken>>>) {
    let client = TonalClient::new(config::client_config());
    let auth_url = client.authorize_url();

    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;

    match token {
        Some(t) => {
            let cache = TokenCache::new(t);
            if let Err(e) = cache.persist().await {
                error!("Failed to save token to cache: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Waits for the OAuth callback to complete and return a token.
///
/// Polls the shared state with a 60-second timeout while the callback
/// handler runs concurrently. Returns `None` when the timeout is reached
/// without a token.
async fn wait_for_token(shared_state: Arc<Mutex<Option<UserToken>>>) -> Option<UserToken> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref() {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Removes the cached token. The next user-scoped command will require a
/// fresh `tonalcli auth`.
pub async fn logout() {
    match TokenCache::clear().await {
        Ok(()) => success!("Logged out; cached token removed."),
        Err(e) => error!("Failed to remove cached token: {}", e),
    }
}

/// Shows the cached token's state and expiry.
pub async fn token_info() {
    let cache = match TokenCache::load().await {
        Ok(cache) => cache,
        Err(_) => {
            info!("No token cached. Run tonalcli auth to sign in.");
            return;
        }
    };

    let token = cache.token();
    let now = Utc::now().naive_utc();
    match token.state_at(now) {
        TokenState::Valid => {
            let remaining = token.expires_at - now;
            info!(
                "Token valid, expires at {} ({} minutes left).",
                token.expires_at.format("%Y-%m-%d %H:%M:%S"),
                remaining.num_minutes()
            );
        }
        _ if token.refresh_token.is_some() => {
            warning!("Token expired; it will be refreshed on the next request.");
        }
        _ => {
            warning!("Token expired with no refresh token. Run tonalcli auth.");
        }
    }
}
