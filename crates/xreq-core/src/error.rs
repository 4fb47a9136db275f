//! Error taxonomy for request preparation and transport.
//!
//! Everything here propagates to the executor boundary, where it becomes an
//! exception document. HTTP-level failures that still carry a response are not
//! errors at this level; see [`crate::transport::TransportError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    /// The options document is not well-formed markup (or is not flat, or repeats a key).
    #[error("options document is not well-formed")]
    MalformedOptionsDocument(#[source] quick_xml::DeError),

    /// The headers document is not well-formed markup, or a header lacks its `Name` attribute.
    #[error("headers document is not well-formed")]
    MalformedHeadersDocument(#[source] quick_xml::DeError),

    /// A reserved header's value could not be converted to its typed request field.
    #[error("cannot convert value {value:?} of header '{name}': {reason}")]
    HeaderValueConversion {
        name: String,
        value: String,
        reason: String,
    },

    /// An option value could not be coerced at its point of use.
    #[error("option '{name}' has invalid value {value:?} (expected {expected})")]
    InvalidOptionValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unknown security protocol {0:?}")]
    UnknownSecurityProtocol(String),

    #[error("invalid request URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Parameters would become a content body on a method that cannot carry one.
    #[error("cannot send a content body with a {method} request")]
    BodyNotAllowed { method: String },

    /// The transport gave up before any response was available (DNS, refused, timeout, TLS).
    #[error("request failed without a response")]
    HttpTransportFailure(#[source] curl::Error),
}

impl RequestError {
    /// Component that raised the error, reported as the exception `Source`.
    pub fn component(&self) -> &'static str {
        match self {
            RequestError::MalformedOptionsDocument(_)
            | RequestError::InvalidOptionValue { .. }
            | RequestError::UnknownSecurityProtocol(_) => "options",
            RequestError::MalformedHeadersDocument(_) | RequestError::HeaderValueConversion { .. } => {
                "headers"
            }
            RequestError::InvalidUrl { .. } | RequestError::BodyNotAllowed { .. } => "request",
            RequestError::HttpTransportFailure(_) => "transport",
        }
    }
}
