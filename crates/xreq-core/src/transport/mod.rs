//! Transport executor: performs the exchange for one [`OutboundRequest`].
//!
//! Three outcomes: a response, an HTTP-level failure that still carries a
//! response (final status >= 400), or a failure with no response at all.

mod easy;
mod parse;
mod status;

pub use easy::CurlTransport;
pub use status::{canonical_reason, status_name};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::request::OutboundRequest;

/// Final response of one exchange, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub method: String,
    pub status: u32,
    pub reason: String,
    pub protocol_version: String,
    /// In wire order; repeated names appear repeatedly.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// URL after redirects.
    pub effective_url: String,
    pub received_at: DateTime<Utc>,
}

impl RawResponse {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Reason phrase, or the canonical one when the protocol sent none.
    pub fn status_description(&self) -> &str {
        if self.reason.is_empty() {
            canonical_reason(self.status)
        } else {
            &self.reason
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered, but with an error status.
    #[error("server answered with HTTP {}", .0.status)]
    Http(Box<RawResponse>),
    /// No response was obtained.
    #[error("request failed without a response")]
    Failure(#[source] curl::Error),
}

/// Sends one request and blocks until it completes.
pub trait Transport {
    fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Error statuses become [`TransportError::Http`]; everything else is a response.
pub fn classify(response: RawResponse) -> Result<RawResponse, TransportError> {
    if response.status >= 400 {
        Err(TransportError::Http(Box::new(response)))
    } else {
        Ok(response)
    }
}
