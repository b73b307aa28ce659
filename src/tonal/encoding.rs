//! Response-body compression handling.
//!
//! Whether compression needs manual handling depends on the execution
//! environment: the default transport here does not negotiate gzip itself,
//! so [`GzipDecoder`] advertises and decompresses it; a transport that
//! already handles compression transparently (e.g. a reqwest client built
//! with its `gzip` feature) pairs with [`PassthroughDecoder`]. Exactly one
//! decoder is active per client, chosen at construction time.

use std::io::Read;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::tonal::transport::{ApiRequest, RawResponse};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decompress response body: {0}")]
    Gzip(#[from] std::io::Error),
}

/// Capability interface for per-request compression negotiation.
pub trait ContentDecoder: Send + Sync {
    /// Amend an outgoing request before dispatch (e.g. advertise gzip).
    fn prepare(&self, request: &mut ApiRequest);

    /// Produce the decoded body bytes for a response.
    fn unwrap_body(&self, response: &RawResponse) -> Result<Vec<u8>, DecodeError>;
}

/// Manual gzip negotiation for transports without transparent compression.
pub struct GzipDecoder;

impl ContentDecoder for GzipDecoder {
    fn prepare(&self, request: &mut ApiRequest) {
        request
            .headers
            .push(("Accept-Encoding".to_string(), "gzip, deflate".to_string()));
    }

    fn unwrap_body(&self, response: &RawResponse) -> Result<Vec<u8>, DecodeError> {
        // Case-insensitive substring match: servers answer with values like
        // "gzip", "GZIP" or "gzip, identity".
        let gzipped = response
            .header("Content-Encoding")
            .map(|v| v.to_ascii_lowercase().contains("gzip"))
            .unwrap_or(false);

        if !gzipped {
            return Ok(response.body.clone());
        }

        let mut decoded = Vec::new();
        GzDecoder::new(response.body.as_slice()).read_to_end(&mut decoded)?;
        Ok(decoded)
    }
}

/// No-op decoder for environments where the transport already negotiates
/// and decompresses; bodies pass through byte-for-byte.
pub struct PassthroughDecoder;

impl ContentDecoder for PassthroughDecoder {
    fn prepare(&self, _request: &mut ApiRequest) {}

    fn unwrap_body(&self, response: &RawResponse) -> Result<Vec<u8>, DecodeError> {
        Ok(response.body.clone())
    }
}
