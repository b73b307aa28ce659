//! Configuration management for the Tonal catalogue client.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files, and assembles the SDK's
//! [`ClientConfig`] from them. The configuration system follows a
//! hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory

use dotenv;
use std::{env, path::PathBuf};

use crate::tonal::{client::ClientConfig, headers::Credentials};

/// Loads environment variables from a `.env` file in the local data
/// directory.
///
/// Creates the directory structure if needed and loads the file from the
/// platform-specific local data directory under `tonalcli/.env`:
/// - Linux: `~/.local/share/tonalcli/.env`
/// - macOS: `~/Library/Application Support/tonalcli/.env`
/// - Windows: `%LOCALAPPDATA%/tonalcli/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tonalcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    // Absent file is fine; the variables may be set in the environment.
    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the server address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Tonal application id issued at API registration.
///
/// # Panics
///
/// Panics if the `TONAL_API_APP_ID` environment variable is not set.
pub fn tonal_app_id() -> String {
    env::var("TONAL_API_APP_ID").expect("TONAL_API_APP_ID must be set")
}

/// Returns the Tonal application secret.
///
/// Used both for signing anonymous requests and as the OAuth client secret
/// in token-endpoint calls. Keep it out of logs and version control.
///
/// # Panics
///
/// Panics if the `TONAL_API_APP_SECRET` environment variable is not set.
pub fn tonal_app_secret() -> String {
    env::var("TONAL_API_APP_SECRET").expect("TONAL_API_APP_SECRET must be set")
}

/// Returns the OAuth redirect URI registered for this application.
///
/// # Panics
///
/// Panics if the `TONAL_API_REDIRECT_URI` environment variable is not set.
pub fn tonal_redirect_uri() -> String {
    env::var("TONAL_API_REDIRECT_URI").expect("TONAL_API_REDIRECT_URI must be set")
}

/// Returns the OAuth scope requested during authorization.
///
/// # Panics
///
/// Panics if the `TONAL_API_AUTH_SCOPE` environment variable is not set.
pub fn tonal_scope() -> String {
    env::var("TONAL_API_AUTH_SCOPE").expect("TONAL_API_AUTH_SCOPE must be set")
}

/// Returns the Tonal OAuth authorization URL (the user-consent page).
///
/// # Panics
///
/// Panics if the `TONAL_API_AUTH_URL` environment variable is not set.
pub fn tonal_auth_url() -> String {
    env::var("TONAL_API_AUTH_URL").expect("TONAL_API_AUTH_URL must be set")
}

/// Returns the Tonal catalogue API base URL.
///
/// # Panics
///
/// Panics if the `TONAL_API_URL` environment variable is not set.
pub fn tonal_api_url() -> String {
    env::var("TONAL_API_URL").expect("TONAL_API_URL must be set")
}

/// Returns the Tonal OAuth token endpoint URL.
///
/// # Panics
///
/// Panics if the `TONAL_API_TOKEN_URL` environment variable is not set.
pub fn tonal_token_url() -> String {
    env::var("TONAL_API_TOKEN_URL").expect("TONAL_API_TOKEN_URL must be set")
}

/// Assembles the SDK configuration from the environment.
///
/// # Panics
///
/// Panics if any of the required `TONAL_API_*` variables is not set.
pub fn client_config() -> ClientConfig {
    ClientConfig {
        api_url: tonal_api_url(),
        auth_url: tonal_auth_url(),
        token_url: tonal_token_url(),
        redirect_uri: tonal_redirect_uri(),
        scope: tonal_scope(),
        credentials: Credentials {
            app_id: tonal_app_id(),
            app_secret: tonal_app_secret(),
        },
    }
}
