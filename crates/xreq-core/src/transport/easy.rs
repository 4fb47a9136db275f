//! libcurl transport: one `Easy` handle per request, performed on the calling thread.
//!
//! Every setting, including the TLS version window, lives on that handle only.
//! Call from `spawn_blocking` if used from async code.

use chrono::Utc;
use curl::easy::{Easy, List, TimeCondition};
use std::time::Duration;

use super::parse::parse_head;
use super::{classify, RawResponse, Transport, TransportError};
use crate::config::XreqConfig;
use crate::request::OutboundRequest;

#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    default_timeout: Duration,
    follow_redirects: bool,
    max_redirections: u32,
    user_agent: Option<String>,
    verbose: bool,
}

impl CurlTransport {
    pub fn new(cfg: &XreqConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            default_timeout: Duration::from_millis(cfg.default_timeout_ms),
            follow_redirects: cfg.follow_redirects,
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
            verbose: cfg.verbose,
        }
    }

    fn configure(&self, easy: &mut Easy, req: &OutboundRequest) -> Result<(), curl::Error> {
        easy.url(&req.url)?;
        easy.verbose(self.verbose)?;
        easy.follow_location(self.follow_redirects)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        // Zero means no limit to libcurl.
        easy.timeout(req.timeout.unwrap_or(self.default_timeout))?;

        match (req.method.as_str(), &req.body) {
            ("GET", _) => easy.get(true)?,
            ("HEAD", _) => easy.nobody(true)?,
            ("POST", Some(body)) => easy.post_fields_copy(body)?,
            ("POST", None) => {
                easy.post(true)?;
                easy.post_field_size(0)?;
            }
            (other, body) => {
                if let Some(body) = body {
                    easy.post_fields_copy(body)?;
                }
                easy.custom_request(other)?;
            }
        }

        if req.decompress {
            easy.accept_encoding("gzip, deflate")?;
        }
        if let Some((min, max)) = req.security.and_then(|s| s.version_window()) {
            easy.ssl_min_max_version(min, max)?;
        }

        let f = &req.fields;
        if let Some(ua) = f.user_agent.as_ref().or(self.user_agent.as_ref()) {
            easy.useragent(ua)?;
        }
        if let Some(referer) = &f.referer {
            easy.referer(referer)?;
        }
        if let Some(range) = &f.range {
            easy.range(&format!("{}-{}", range.start, range.end))?;
        }
        if let Some(since) = &f.if_modified_since {
            easy.time_condition(TimeCondition::IfModifiedSince)?;
            easy.time_value(since.timestamp())?;
        }

        let lines = req.header_lines();
        if !lines.is_empty() {
            let mut list = List::new();
            for line in &lines {
                list.append(line)?;
            }
            easy.http_headers(list)?;
        }
        Ok(())
    }

    fn perform(&self, req: &OutboundRequest) -> Result<RawResponse, curl::Error> {
        let mut easy = Easy::new();
        self.configure(&mut easy, req)?;

        let mut head_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                head_lines.push(String::from_utf8_lossy(data).trim_end().to_string());
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let head = parse_head(&head_lines);
        let status = match head.status {
            Some(code) => code,
            None => easy.response_code()?,
        };
        let effective_url = easy
            .effective_url()?
            .map_or_else(|| req.url.clone(), str::to_string);

        Ok(RawResponse {
            method: req.method.clone(),
            status,
            reason: head.reason,
            protocol_version: head.protocol_version,
            headers: head.headers,
            body,
            effective_url,
            received_at: Utc::now(),
        })
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(&XreqConfig::default())
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        tracing::info!(method = %request.method, url = %request.url, "sending request");
        let response = self.perform(request).map_err(|e| {
            tracing::warn!(url = %request.url, "request failed: {}", e);
            TransportError::Failure(e)
        })?;
        tracing::info!(
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );
        classify(response)
    }
}
