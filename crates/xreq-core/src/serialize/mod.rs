//! Response serializer: turns each terminal outcome into a `Response` document.
//!
//! - success: every descriptive field of the response, trace only with `debug`
//! - HTTP error: server/status fields, trace always attached
//! - exception: trace plus the recursive exception record

mod exception;

pub use exception::ExceptionRecord;

use base64::prelude::*;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::document::Element;
use crate::error::RequestError;
use crate::headers::parse_date;
use crate::options::OptionSet;
use crate::trace::ExecutionTrace;
use crate::transport::{status_name, RawResponse};

/// Structured description of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub character_set: String,
    pub content_encoding: String,
    /// `-1` when the server sent no `Content-Length`.
    pub content_length: i64,
    pub content_type: String,
    pub cookie_count: usize,
    pub header_count: usize,
    /// Header name to every value, names grouped case-insensitively in first-seen order.
    pub headers: Vec<(String, Vec<String>)>,
    pub from_cache: bool,
    pub mutually_authenticated: bool,
    pub last_modified: DateTime<Utc>,
    pub method: String,
    pub protocol_version: String,
    pub resolved_uri: String,
    pub server: String,
    pub status_code: String,
    pub status_number: u32,
    pub status_description: String,
    pub supports_headers: bool,
    pub body: String,
}

impl ResponseRecord {
    pub fn from_response(raw: &RawResponse, body: String) -> Self {
        let headers = group_headers(&raw.headers);
        let content_type = raw.header("Content-Type").unwrap_or_default().to_string();
        Self {
            character_set: charset_of(&content_type),
            content_encoding: raw.header("Content-Encoding").unwrap_or_default().to_string(),
            content_length: raw
                .header("Content-Length")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(-1),
            content_type,
            cookie_count: raw.header_values("Set-Cookie").count(),
            header_count: headers.len(),
            headers,
            from_cache: false,
            mutually_authenticated: false,
            last_modified: raw
                .header("Last-Modified")
                .and_then(|v| parse_date(v).ok())
                .unwrap_or(raw.received_at),
            method: raw.method.clone(),
            protocol_version: raw.protocol_version.clone(),
            resolved_uri: raw.effective_url.clone(),
            server: raw.header("Server").unwrap_or_default().to_string(),
            status_code: status_name(raw.status),
            status_number: raw.status,
            status_description: raw.status_description().to_string(),
            supports_headers: true,
            body,
        }
    }

    pub fn to_element(&self) -> Element {
        let mut headers = Element::new("Headers");
        for (name, values) in &self.headers {
            let mut values_el = Element::new("Values");
            for v in values {
                values_el.push(Element::leaf("Value", v));
            }
            headers.push(
                Element::new("Header")
                    .with_child(Element::leaf("Name", name))
                    .with_child(values_el),
            );
        }

        Element::new("Response")
            .with_child(Element::leaf("CharacterSet", &self.character_set))
            .with_child(Element::leaf("ContentEncoding", &self.content_encoding))
            .with_child(Element::leaf("ContentLength", self.content_length))
            .with_child(Element::leaf("ContentType", &self.content_type))
            .with_child(Element::leaf("CookiesCount", self.cookie_count))
            .with_child(Element::leaf("HeadersCount", self.header_count))
            .with_child(headers)
            .with_child(Element::leaf("IsFromCache", self.from_cache))
            .with_child(Element::leaf("IsMutuallyAuthenticated", self.mutually_authenticated))
            .with_child(Element::leaf(
                "LastModified",
                self.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            ))
            .with_child(Element::leaf("Method", &self.method))
            .with_child(Element::leaf("ProtocolVersion", &self.protocol_version))
            .with_child(Element::leaf("ResponseUri", &self.resolved_uri))
            .with_child(Element::leaf("Server", &self.server))
            .with_child(Element::leaf("StatusCode", &self.status_code))
            .with_child(Element::leaf("StatusNumber", self.status_number))
            .with_child(Element::leaf("StatusDescription", &self.status_description))
            .with_child(Element::leaf("SupportsHeaders", self.supports_headers))
            .with_child(Element::leaf("Body", &self.body))
    }
}

/// Reduced record for an error status that still carried a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponseRecord {
    pub server: String,
    pub status_code: String,
    pub status_number: u32,
    pub status_description: String,
}

impl ErrorResponseRecord {
    pub fn from_response(raw: &RawResponse) -> Self {
        Self {
            server: raw.header("Server").unwrap_or_default().to_string(),
            status_code: status_name(raw.status),
            status_number: raw.status,
            status_description: raw.status_description().to_string(),
        }
    }
}

/// Success path. Reads `convert_response_to_base64` and `debug` at their point of use.
pub fn success_document(
    raw: &RawResponse,
    options: &OptionSet,
    trace: &mut ExecutionTrace,
) -> Result<Element, RequestError> {
    trace.record("Processed Response Headers");

    let body = if options.convert_response_to_base64()? {
        BASE64_STANDARD.encode(&raw.body)
    } else {
        decode_text(&raw.body)
    };
    trace.record("Handled Option 'convert_response_to_base64' and Retrieved Response Body");

    let mut doc = ResponseRecord::from_response(raw, body).to_element();
    trace.record("Assembled Return Document");
    if options.debug()? {
        doc.push(trace.to_element());
    }
    Ok(doc)
}

/// HTTP-error path. The trace is attached whatever `debug` says.
pub fn error_response_document(raw: &RawResponse, trace: &ExecutionTrace) -> Element {
    let record = ErrorResponseRecord::from_response(raw);
    Element::new("Response")
        .with_child(Element::leaf("Server", &record.server))
        .with_child(Element::leaf("StatusCode", &record.status_code))
        .with_child(Element::leaf("StatusNumber", record.status_number))
        .with_child(Element::leaf("StatusDescription", &record.status_description))
        .with_child(trace.to_element())
}

/// Exception path: trace first, then the exception chain.
pub fn exception_document(trace: &ExecutionTrace, err: &anyhow::Error) -> Element {
    Element::new("Response")
        .with_child(trace.to_element())
        .with_child(ExceptionRecord::from_error(err).to_element())
}

/// UTF-8 text, lossy, without a leading byte order mark.
fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text[..]).to_string()
}

fn charset_of(content_type: &str) -> String {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .unwrap_or_default()
}

fn group_headers(headers: &[(String, String)]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in headers {
        match grouped.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, values)) => values.push(value.clone()),
            None => grouped.push((name.clone(), vec![value.clone()])),
        }
    }
    grouped
}
