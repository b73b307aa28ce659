use std::collections::VecDeque;
use std::io::Write;
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use flate2::{Compression, write::GzEncoder};
use tokio::sync::Mutex;

use tonalcli::error::ApiError;
use tonalcli::management::TokenCache;
use tonalcli::tonal::client::{ClientConfig, TonalClient};
use tonalcli::tonal::encoding::{ContentDecoder, GzipDecoder, PassthroughDecoder};
use tonalcli::tonal::headers::{self, Credentials};
use tonalcli::tonal::transport::{ApiRequest, HttpTransport, RawResponse, TransportError};
use tonalcli::types::{TokenState, UserToken};

// Scripted transport double: pops pre-loaded outcomes in order, records
// every request, and counts calls so tests can assert "no network I/O".
struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    calls: AtomicU32,
}

impl MockTransport {
    fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn recorded(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("mock transport exhausted".to_string())))
    }
}

fn ok_json(status: u16, body: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status,
        headers: vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )],
        body: body.as_bytes().to_vec(),
    })
}

fn test_config() -> ClientConfig {
    ClientConfig {
        api_url: "https://api.test/2.0".to_string(),
        auth_url: "https://account.test/authorize".to_string(),
        token_url: "https://account.test/token".to_string(),
        redirect_uri: "http://127.0.0.1:8199/callback".to_string(),
        scope: "read_usermusic".to_string(),
        credentials: Credentials {
            app_id: "test-app".to_string(),
            app_secret: "test-secret".to_string(),
        },
    }
}

fn client_with(transport: Arc<MockTransport>) -> TonalClient {
    TonalClient::with_parts(test_config(), transport, Box::new(GzipDecoder))
}

fn valid_token() -> UserToken {
    UserToken {
        access_token: "VALID-AT".to_string(),
        refresh_token: Some("VALID-RT".to_string()),
        expires_at: Utc::now().naive_utc() + Duration::hours(1),
        token_type: "bearer".to_string(),
    }
}

fn expired_token() -> UserToken {
    UserToken {
        access_token: "OLD-AT".to_string(),
        refresh_token: Some("OLD-RT".to_string()),
        expires_at: Utc::now().naive_utc() - Duration::hours(1),
        token_type: "bearer".to_string(),
    }
}

const TOKEN_JSON: &str =
    r#"{"access_token":"NEW-AT","refresh_token":"NEW-RT","expires_in":3600,"token_type":"bearer"}"#;
const FAVOURITES_JSON: &str =
    r#"{"items":[{"id":"r1","name":"First"},{"id":"r2","name":"Second"}]}"#;

#[tokio::test]
async fn test_user_call_with_absent_token_makes_no_network_call() {
    let transport = MockTransport::new(vec![]);
    let client = client_with(Arc::clone(&transport));

    let result = client.favourites(10).await;

    assert!(matches!(result, Err(ApiError::AuthenticationRequired(_))));
    // Failed before any I/O
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_expired_token_without_refresh_token_fails_without_io() {
    let transport = MockTransport::new(vec![]);
    let client = client_with(Arc::clone(&transport));

    let token = UserToken {
        refresh_token: None,
        ..expired_token()
    };
    client.set_token(Some(token)).await;

    let result = client.favourites(10).await;

    assert!(matches!(result, Err(ApiError::AuthenticationRequired(_))));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_call_proceeds() {
    let transport = MockTransport::new(vec![
        ok_json(200, TOKEN_JSON),
        ok_json(200, FAVOURITES_JSON),
    ]);
    let client = client_with(Arc::clone(&transport));
    client.set_token(Some(expired_token())).await;

    let envelope = client.favourites(10).await.unwrap();

    // The original call went through after the silent refresh
    assert!(envelope.is_success());
    assert_eq!(envelope.status, Some(200));
    assert_eq!(envelope.result.as_ref().map(Vec::len), Some(2));
    assert_eq!(envelope.header("content-type"), Some("application/json"));
    assert_eq!(transport.calls(), 2);

    // The whole token was replaced and is valid again
    let token = client.current_token().await.unwrap();
    assert_eq!(token.access_token, "NEW-AT");
    assert_eq!(token.refresh_token.as_deref(), Some("NEW-RT"));
    assert_eq!(client.token_state().await, TokenState::Valid);

    // First request was the refresh grant with the stored refresh token
    let recorded = transport.recorded().await;
    let form = recorded[0].form.clone().unwrap();
    assert_eq!(recorded[0].url, "https://account.test/token");
    assert!(form.contains(&("grant_type".to_string(), "refresh_token".to_string())));
    assert!(form.contains(&("refresh_token".to_string(), "OLD-RT".to_string())));
    assert!(form.contains(&("client_id".to_string(), "test-app".to_string())));
    assert!(form.contains(&("client_secret".to_string(), "test-secret".to_string())));

    // Second request carried the fresh bearer header
    assert_eq!(recorded[1].header("Authorization"), Some("Bearer NEW-AT"));
}

#[tokio::test]
async fn test_refresh_keeps_old_refresh_token_when_response_omits_it() {
    let transport = MockTransport::new(vec![
        ok_json(200, r#"{"access_token":"NEW-AT","expires_in":3600}"#),
        ok_json(200, FAVOURITES_JSON),
    ]);
    let client = client_with(Arc::clone(&transport));
    client.set_token(Some(expired_token())).await;

    client.favourites(10).await.unwrap();

    let token = client.current_token().await.unwrap();
    assert_eq!(token.access_token, "NEW-AT");
    // Carried forward from the expired token
    assert_eq!(token.refresh_token.as_deref(), Some("OLD-RT"));
}

#[tokio::test]
async fn test_failed_refresh_leaves_token_expired_and_fails_call() {
    let transport = MockTransport::new(vec![ok_json(500, "{}")]);
    let client = client_with(Arc::clone(&transport));

    let original = expired_token();
    client.set_token(Some(original.clone())).await;

    let result = client.favourites(10).await;

    assert!(matches!(
        result,
        Err(ApiError::TokenRefreshFailed { status: Some(500) })
    ));
    // Only the refresh attempt hit the wire
    assert_eq!(transport.calls(), 1);

    // The stored token is untouched, still expired, not cleared
    assert_eq!(client.current_token().await, Some(original));
    assert_eq!(client.token_state().await, TokenState::Expired);
}

#[tokio::test]
async fn test_refresh_transport_failure_reports_no_status() {
    let transport = MockTransport::new(vec![Err(TransportError::Other(
        "connection refused".to_string(),
    ))]);
    let client = client_with(Arc::clone(&transport));
    client.set_token(Some(expired_token())).await;

    let result = client.favourites(10).await;

    assert!(matches!(
        result,
        Err(ApiError::TokenRefreshFailed { status: None })
    ));
    assert_eq!(client.token_state().await, TokenState::Expired);
}

#[tokio::test]
async fn test_one_refresh_serves_subsequent_calls() {
    let transport = MockTransport::new(vec![
        ok_json(200, TOKEN_JSON),
        ok_json(200, FAVOURITES_JSON),
        ok_json(200, FAVOURITES_JSON),
    ]);
    let client = client_with(Arc::clone(&transport));
    client.set_token(Some(expired_token())).await;

    client.favourites(10).await.unwrap();
    client.favourites(10).await.unwrap();

    // Two data calls, one refresh; the second call found a valid token
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_valid_token_is_used_as_is() {
    let transport = MockTransport::new(vec![ok_json(200, FAVOURITES_JSON)]);
    let client = client_with(Arc::clone(&transport));
    client.set_token(Some(valid_token())).await;

    let envelope = client.favourites(10).await.unwrap();

    assert!(envelope.is_success());
    assert_eq!(transport.calls(), 1);
    let recorded = transport.recorded().await;
    assert_eq!(recorded[0].header("Authorization"), Some("Bearer VALID-AT"));
}

#[tokio::test]
async fn test_http_error_is_reported_in_envelope_not_raised() {
    let transport = MockTransport::new(vec![ok_json(404, "no such thing")]);
    let client = client_with(Arc::clone(&transport));

    let envelope = client.new_releases(20).await.unwrap();

    assert!(!envelope.is_success());
    assert_eq!(envelope.status, Some(404));
    assert_eq!(envelope.result, None);
    assert!(envelope.error_message.as_deref().unwrap().contains("no such thing"));
}

#[tokio::test]
async fn test_transport_failure_yields_envelope_without_status() {
    let transport = MockTransport::new(vec![Err(TransportError::Other(
        "connection refused".to_string(),
    ))]);
    let client = client_with(Arc::clone(&transport));

    let envelope = client.new_releases(20).await.unwrap();

    assert!(!envelope.is_success());
    assert_eq!(envelope.status, None);
    assert!(
        envelope
            .error_message
            .as_deref()
            .unwrap()
            .contains("connection refused")
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_a_failed_envelope() {
    let transport = MockTransport::new(vec![ok_json(200, "{ not json")]);
    let client = client_with(Arc::clone(&transport));

    let envelope = client.new_releases(20).await.unwrap();

    assert!(!envelope.is_success());
    assert_eq!(envelope.status, Some(200));
}

#[tokio::test]
async fn test_anonymous_call_is_signed_and_advertises_gzip() {
    let transport = MockTransport::new(vec![ok_json(200, r#"{"items":[]}"#)]);
    let client = client_with(Arc::clone(&transport));

    let envelope = client.new_releases(5).await.unwrap();
    assert!(envelope.is_success());

    let recorded = transport.recorded().await;
    let auth = recorded[0].header("Authorization").unwrap();
    assert!(auth.starts_with("TONAL-HMAC-SHA256 app_id=\"test-app\""));
    assert!(auth.contains("sig=\""));
    assert_eq!(recorded[0].header("Accept-Encoding"), Some("gzip, deflate"));
}

#[tokio::test]
async fn test_gzip_response_is_transparently_decompressed() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(FAVOURITES_JSON.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    // Upper-case header value on purpose: matching is case-insensitive
    let transport = MockTransport::new(vec![Ok(RawResponse {
        status: 200,
        headers: vec![("Content-Encoding".to_string(), "GZIP".to_string())],
        body: compressed,
    })]);
    let client = client_with(Arc::clone(&transport));

    let envelope = client.new_releases(5).await.unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.result.map(|items| items.len()), Some(2));
}

#[test]
fn test_gzip_decoder_passes_plain_bodies_through() {
    let response = RawResponse {
        status: 200,
        headers: vec![],
        body: b"plain bytes".to_vec(),
    };

    let body = GzipDecoder.unwrap_body(&response).unwrap();
    // Byte-for-byte unchanged without a Content-Encoding header
    assert_eq!(body, b"plain bytes");
}

#[test]
fn test_passthrough_decoder_adds_no_header_and_keeps_body() {
    let mut request = ApiRequest::get("https://api.test/2.0/genres");
    PassthroughDecoder.prepare(&mut request);
    assert!(request.header("Accept-Encoding").is_none());

    let response = RawResponse {
        status: 200,
        headers: vec![("Content-Encoding".to_string(), "gzip".to_string())],
        body: b"already decoded by the transport".to_vec(),
    };
    let body = PassthroughDecoder.unwrap_body(&response).unwrap();
    assert_eq!(body, b"already decoded by the transport");
}

#[test]
fn test_signed_header_is_deterministic() {
    let credentials = Credentials {
        app_id: "test-app".to_string(),
        app_secret: "test-secret".to_string(),
    };

    let a = headers::signed(&credentials, "GET", "/genres", 1700000000, "nonce123");
    let b = headers::signed(&credentials, "GET", "/genres", 1700000000, "nonce123");
    // Identical inputs produce an identical header
    assert_eq!(a, b);

    // Any varying input changes the signature
    let c = headers::signed(&credentials, "GET", "/genres", 1700000000, "nonce124");
    assert_ne!(a, c);
    let d = headers::signed(&credentials, "GET", "/artists/top", 1700000000, "nonce123");
    assert_ne!(a, d);
}

#[test]
fn test_bearer_header_requires_valid_token() {
    let now = Utc::now().naive_utc();

    let result = headers::bearer(None, now);
    assert!(matches!(result, Err(ApiError::AuthenticationRequired(_))));

    let expired = expired_token();
    let result = headers::bearer(Some(&expired), now);
    assert!(matches!(result, Err(ApiError::AuthenticationRequired(_))));

    let valid = valid_token();
    let headers = headers::bearer(Some(&valid), now).unwrap();
    assert_eq!(
        headers,
        vec![("Authorization".to_string(), "Bearer VALID-AT".to_string())]
    );
}

#[tokio::test]
async fn test_token_cache_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");

    let token = valid_token();
    TokenCache::with_path(path.clone(), token.clone())
        .persist()
        .await
        .unwrap();

    let loaded = TokenCache::load_from(&path).await.unwrap();
    assert_eq!(loaded.token(), &token);
}

#[tokio::test]
async fn test_set_token_replaces_and_clears_whole_value() {
    let transport = MockTransport::new(vec![]);
    let client = client_with(transport);

    assert_eq!(client.token_state().await, TokenState::Absent);

    client.set_token(Some(valid_token())).await;
    assert_eq!(client.token_state().await, TokenState::Valid);

    // Clearing twice is idempotent
    client.set_token(None).await;
    assert_eq!(client.token_state().await, TokenState::Absent);
    client.set_token(None).await;
    assert_eq!(client.token_state().await, TokenState::Absent);
}
