use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

use crate::error::ApiError;

/// Serde adapter for token expiry timestamps.
///
/// Expiry instants are written in the fixed format
/// `%Y-%m-%dT%H:%M:%S%.f` with no timezone designator and no timezone
/// conversion in either direction. The instant is interpreted as UTC
/// everywhere; keeping the format zone-free means a token written on one
/// machine and read on another never shifts its expiry during parsing.
pub mod token_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Classification of the client's stored token at a point in time.
///
/// `Expired` is deliberately distinct from `Absent`: an expired token still
/// carries a refresh token usable for silent renewal, an absent one does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Absent,
    Valid,
    Expired,
}

impl TokenState {
    /// Classify an optional token against `now`.
    ///
    /// The boundary is inclusive-expired: a token whose expiry equals `now`
    /// is already `Expired`.
    pub fn classify(token: Option<&UserToken>, now: NaiveDateTime) -> Self {
        match token {
            None => TokenState::Absent,
            Some(t) if now >= t.expires_at => TokenState::Expired,
            Some(_) => TokenState::Valid,
        }
    }
}

/// An OAuth2 user token as held by the client.
///
/// The value is only ever replaced as a whole; no partial field mutation is
/// exposed, so readers can never observe a torn token.
///
/// Two lossless serialized forms exist:
/// - a JSON form via serde, with `expires_at` in the fixed
///   [`token_timestamp`] format;
/// - a compact single-line form via [`to_compact`](UserToken::to_compact) /
///   [`from_compact`](UserToken::from_compact) for lightweight persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(with = "token_timestamp")]
    pub expires_at: NaiveDateTime,
    pub token_type: String,
}

impl UserToken {
    /// Classify this token against `now` (never returns `Absent`).
    pub fn state_at(&self, now: NaiveDateTime) -> TokenState {
        TokenState::classify(Some(self), now)
    }

    /// Render the compact persisted form.
    ///
    /// One line, `|`-delimited, field order
    /// `access_token|refresh_token|expires_at|token_type`. A missing refresh
    /// token is an empty second field. The delimiter and field order are a
    /// persisted contract and must not change; `|` cannot occur in OAuth
    /// token material or in the timestamp format.
    pub fn to_compact(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.access_token,
            self.refresh_token.as_deref().unwrap_or(""),
            self.expires_at.format(token_timestamp::FORMAT),
            self.token_type,
        )
    }

    /// Parse the compact form produced by [`to_compact`](UserToken::to_compact).
    pub fn from_compact(line: &str) -> Result<Self, ApiError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('|').collect();
        if fields.len() != 4 {
            return Err(ApiError::InvalidToken(format!(
                "expected 4 fields, found {}",
                fields.len()
            )));
        }

        let expires_at = NaiveDateTime::parse_from_str(fields[2], token_timestamp::FORMAT)
            .map_err(|e| ApiError::InvalidToken(format!("bad expiry timestamp: {e}")))?;

        Ok(UserToken {
            access_token: fields[0].to_string(),
            refresh_token: if fields[1].is_empty() {
                None
            } else {
                Some(fields[1].to_string())
            },
            expires_at,
            token_type: fields[3].to_string(),
        })
    }
}

/// Wire shape of a token-endpoint response (exchange and refresh).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Convert the relative `expires_in` into an absolute expiry anchored at
    /// `now`. A missing `token_type` defaults to `"bearer"`.
    pub fn into_user_token(self, now: NaiveDateTime) -> UserToken {
        UserToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: now + Duration::seconds(self.expires_in),
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
        }
    }
}

/// Outcome of a single catalogue call: parsed result alongside HTTP status
/// and response headers. Constructed once per call and not mutated after.
///
/// `status: None` marks a transport failure (the request never produced an
/// HTTP response); a present status with `result: None` is an HTTP-level
/// failure. Neither is a Rust error.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub result: Option<T>,
    pub status: Option<u16>,
    pub error_message: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl<T> Envelope<T> {
    pub fn success(result: T, status: u16, headers: Vec<(String, String)>) -> Self {
        Self {
            result: Some(result),
            status: Some(status),
            error_message: None,
            headers,
        }
    }

    pub fn failure(
        status: u16,
        message: impl Into<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            result: None,
            status: Some(status),
            error_message: Some(message.into()),
            headers,
        }
    }

    /// A call that never reached the server (connect/timeout/TLS failure).
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            result: None,
            status: None,
            error_message: Some(message.into()),
            headers: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// Case-insensitive response header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Artist {
    /// Converter for the list parser; `None` skips a malformed element.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
}

impl Release {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

impl Genre {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub id: String,
    pub name: String,
}
