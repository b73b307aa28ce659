use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::ApiError,
    tonal::{
        encoding::{ContentDecoder, GzipDecoder},
        headers::{self, Credentials},
        parse::Payload,
        transport::{ApiRequest, HttpTransport, ReqwestTransport},
    },
    types::{Envelope, TokenResponse, TokenState, UserToken},
};

/// Upper bound on response-body bytes copied into an envelope's error
/// message.
const ERROR_BODY_LIMIT: usize = 8 * 1024;

/// Static configuration for a [`TonalClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalogue API base URL, no trailing slash.
    pub api_url: String,
    /// OAuth2 authorization page the user consents on.
    pub auth_url: String,
    /// OAuth2 token endpoint (code exchange and refresh).
    pub token_url: String,
    pub redirect_uri: String,
    pub scope: String,
    pub credentials: Credentials,
}

/// Façade over the Tonal catalogue API.
///
/// Owns the user token for the session (persisted copies are somebody
/// else's concern; the in-memory value here is the source of truth) and
/// sequences token validation, refresh and request dispatch for every
/// endpoint method. Endpoint methods live in the sibling modules as further
/// `impl TonalClient` blocks.
///
/// The transport and body decoder are strategy objects fixed at
/// construction; host applications pick the pair matching their
/// environment, tests inject doubles.
pub struct TonalClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    decoder: Box<dyn ContentDecoder>,
    token: RwLock<Option<UserToken>>,
    refresh_gate: Mutex<()>,
}

impl TonalClient {
    /// Client with the default transport (reqwest, 30s timeout) and manual
    /// gzip negotiation.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_parts(config, Arc::new(ReqwestTransport::new()), Box::new(GzipDecoder))
    }

    /// Client with explicit transport and decoder implementations.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        decoder: Box<dyn ContentDecoder>,
    ) -> Self {
        Self {
            config,
            transport,
            decoder,
            token: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the stored token as a whole; `None` clears it (logout).
    ///
    /// Replacement is atomic behind the lock, so concurrent readers never
    /// observe a half-written token. There is no partial-field update.
    pub async fn set_token(&self, token: Option<UserToken>) {
        *self.token.write().await = token;
    }

    pub async fn current_token(&self) -> Option<UserToken> {
        self.token.read().await.clone()
    }

    /// Classify the stored token right now.
    pub async fn token_state(&self) -> TokenState {
        TokenState::classify(self.token.read().await.as_ref(), Utc::now().naive_utc())
    }

    /// Make sure a Valid token is in place for a user-scoped call,
    /// refreshing once if the stored token is expired.
    ///
    /// Fails fast, before any network I/O, when no token is set or when an
    /// expired token has no refresh token to renew with.
    async fn ensure_valid_token(&self) -> Result<(), ApiError> {
        let now = Utc::now().naive_utc();
        {
            let guard = self.token.read().await;
            match guard.as_ref() {
                None => return Err(ApiError::AuthenticationRequired("no token set")),
                Some(t) if t.state_at(now) == TokenState::Valid => return Ok(()),
                Some(_) => {} // expired; fall through to refresh
            }
        }
        self.refresh().await
    }

    /// Refresh the stored token using its refresh token.
    ///
    /// Refreshes are serialized by `refresh_gate`: concurrent callers that
    /// all observed Expired queue up here, and everyone after the first
    /// finds a Valid token on the re-check and returns without a second
    /// token-endpoint call. On rejection or transport failure the stored
    /// token is left untouched (still expired), so the caller can retry
    /// later or force a re-login.
    async fn refresh(&self) -> Result<(), ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let now = Utc::now().naive_utc();
        let refresh_token = {
            let guard = self.token.read().await;
            match guard.as_ref() {
                None => return Err(ApiError::AuthenticationRequired("no token set")),
                Some(t) if t.state_at(now) == TokenState::Valid => return Ok(()),
                Some(t) => match t.refresh_token.clone() {
                    Some(r) => r,
                    None => {
                        return Err(ApiError::AuthenticationRequired(
                            "expired token has no refresh token",
                        ));
                    }
                },
            }
        };

        let form = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.clone()),
            ("client_id".to_string(), self.config.credentials.app_id.clone()),
            (
                "client_secret".to_string(),
                self.config.credentials.app_secret.clone(),
            ),
        ];

        let response = self
            .request_token(form)
            .await
            .map_err(|status| ApiError::TokenRefreshFailed { status })?;

        let mut renewed = response.into_user_token(Utc::now().naive_utc());
        if renewed.refresh_token.is_none() {
            // The endpoint may omit the refresh token when it does not
            // rotate; carry the old one forward.
            renewed.refresh_token = Some(refresh_token);
        }

        *self.token.write().await = Some(renewed);
        tracing::info!(target: "tonal", "access token refreshed");
        Ok(())
    }

    /// POST a grant form to the token endpoint and decode the response.
    ///
    /// `Err(Some(status))` is a rejection, `Err(None)` a transport failure;
    /// callers map these onto their own taxonomy variant.
    pub(crate) async fn request_token(
        &self,
        form: Vec<(String, String)>,
    ) -> Result<TokenResponse, Option<u16>> {
        let request = ApiRequest::post_form(&self.config.token_url, form);

        let response = match self.transport.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(target: "tonal", error = %e, "token request failed in transport");
                return Err(None);
            }
        };

        if !response.is_success() {
            tracing::warn!(target: "tonal", status = response.status, "token endpoint rejected request");
            return Err(Some(response.status));
        }

        serde_json::from_slice::<TokenResponse>(&response.body).map_err(|e| {
            tracing::warn!(target: "tonal", error = %e, "token endpoint returned malformed body");
            Some(response.status)
        })
    }

    /// Run one catalogue GET through the full pipeline: auth headers,
    /// compression negotiation, dispatch, body decoding, payload parsing.
    ///
    /// Server and network outcomes are reported through the envelope; the
    /// only `Err` cases are the auth preconditions (no usable token) and a
    /// failed refresh.
    pub(crate) async fn get_list<T>(
        &self,
        path_and_query: &str,
        user: bool,
        payload: Payload,
        convert: impl Fn(&Value) -> Option<T>,
    ) -> Result<Envelope<Vec<T>>, ApiError> {
        let auth_headers = if user {
            self.ensure_valid_token().await?;
            let guard = self.token.read().await;
            headers::bearer(guard.as_ref(), Utc::now().naive_utc())?
        } else {
            let path = path_and_query
                .split('?')
                .next()
                .unwrap_or(path_and_query);
            headers::signed(
                &self.config.credentials,
                "GET",
                path,
                Utc::now().timestamp(),
                &headers::generate_nonce(),
            )
        };

        let url = format!("{}{}", self.config.api_url, path_and_query);
        let mut request = ApiRequest::get(&url);
        request.headers.extend(auth_headers);
        self.decoder.prepare(&mut request);

        tracing::debug!(target: "tonal", %url, user, "dispatching catalogue request");

        let response = match self.transport.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(target: "tonal", error = %e, "catalogue request failed in transport");
                return Ok(Envelope::unreachable(e.to_string()));
            }
        };

        let status = response.status;
        let response_headers = response.headers.clone();

        let body = match self.decoder.unwrap_body(&response) {
            Ok(b) => b,
            Err(e) => return Ok(Envelope::failure(status, e.to_string(), response_headers)),
        };

        if !response.is_success() {
            return Ok(Envelope::failure(
                status,
                body_snippet(&body),
                response_headers,
            ));
        }

        let text = String::from_utf8_lossy(&body);
        match payload.parse(&text, convert) {
            Ok(items) => Ok(Envelope::success(items, status, response_headers)),
            Err(e) => Ok(Envelope::failure(
                status,
                format!("failed to parse response body: {e}"),
                response_headers,
            )),
        }
    }
}

/// Bounded, lossy rendering of an error response body.
fn body_snippet(body: &[u8]) -> String {
    let end = body.len().min(ERROR_BODY_LIMIT);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
