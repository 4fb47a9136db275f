//! Request builder: parsed request + mapped headers into one [`OutboundRequest`].
//!
//! Each phase records a trace step as soon as it completes, so a failure in a
//! later phase still shows how far construction got.

use crate::error::RequestError;
use crate::headers::MappedHeaders;
use crate::trace::ExecutionTrace;

use super::{OutboundRequest, RequestSpec};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub fn build(
    spec: &RequestSpec,
    headers: MappedHeaders,
    trace: &mut ExecutionTrace,
) -> Result<OutboundRequest, RequestError> {
    let security = spec.options.security_protocols()?;
    trace.record("Handled Option 'security_protocol'");

    let mut url = spec.url.clone();
    if spec.is_get() && spec.has_parameters() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&spec.raw_parameters);
    }
    trace.record("Handled GET parameters");

    validate_url(&url)?;
    let mut request = OutboundRequest::new(spec.method.as_str(), url);
    request.security = security;
    trace.record("Created request and set method");

    let content_length_supplied = headers.content_length_supplied();
    let content_type_supplied = headers.content_type_supplied();
    request.fields = headers.fields;
    request.headers = headers.generic;
    trace.record("Applied Headers");

    request.timeout = spec.options.timeout()?;
    trace.record("Handled Option 'timeout'");

    request.decompress = spec.options.auto_decompress()?;
    trace.record("Handled Option 'auto_decompress'");

    if !spec.is_get() && spec.has_parameters() {
        if spec.method == "HEAD" {
            return Err(RequestError::BodyNotAllowed {
                method: spec.method.clone(),
            });
        }
        let data = spec.raw_parameters.as_bytes().to_vec();
        if !content_length_supplied {
            request.fields.content_length = Some(data.len() as u64);
        }
        if !content_type_supplied {
            request.fields.content_type = Some(FORM_CONTENT_TYPE.to_string());
        }
        request.body = Some(data);
    }
    trace.record("Handled non-GET Parameters");

    tracing::debug!(
        method = %request.method,
        url = %request.url,
        body_len = request.body.as_ref().map_or(0, Vec::len),
        "built outbound request"
    );
    Ok(request)
}

/// Absolute http(s) URL; the string itself is sent as given.
fn validate_url(raw: &str) -> Result<(), RequestError> {
    let parsed = url::Url::parse(raw).map_err(|e| RequestError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(RequestError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
