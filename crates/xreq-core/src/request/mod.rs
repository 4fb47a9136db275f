//! Request model: raw host inputs, the parsed request, and the fully
//! specified outbound request handed to the transport.

mod builder;

pub use builder::build;

use std::time::Duration;

use crate::document::Element;
use crate::headers::{http_date, HeaderSet, RequestFields};
use crate::options::{OptionSet, SecurityProtocols};

/// The five string inputs supplied by the host environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInputs {
    pub method: String,
    pub url: String,
    pub parameters: Option<String>,
    pub headers_xml: Option<String>,
    pub options_xml: Option<String>,
}

impl RequestInputs {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    pub fn with_headers_xml(mut self, doc: impl Into<String>) -> Self {
        self.headers_xml = Some(doc.into());
        self
    }

    pub fn with_options_xml(mut self, doc: impl Into<String>) -> Self {
        self.options_xml = Some(doc.into());
        self
    }

    /// Echo of the inputs, attached to the first trace step.
    pub fn to_element(&self) -> Element {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        Element::new("InputParameters")
            .with_child(Element::leaf("requestMethod", &self.method))
            .with_child(Element::leaf("url", &self.url))
            .with_child(Element::leaf("parameters", opt(&self.parameters)))
            .with_child(Element::leaf("headersXml", opt(&self.headers_xml)))
            .with_child(Element::leaf("optionsXml", opt(&self.options_xml)))
    }
}

/// Parsed request: method normalized to upper case, documents decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub raw_parameters: String,
    pub options: OptionSet,
    pub headers: HeaderSet,
}

impl RequestSpec {
    pub fn new(
        method: &str,
        url: &str,
        raw_parameters: Option<&str>,
        options: OptionSet,
        headers: HeaderSet,
    ) -> Self {
        Self {
            method: method.trim().to_ascii_uppercase(),
            url: url.trim().to_string(),
            raw_parameters: raw_parameters.unwrap_or_default().to_string(),
            options,
            headers,
        }
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Parameters count only when they contain something other than whitespace.
    pub fn has_parameters(&self) -> bool {
        !self.raw_parameters.trim().is_empty()
    }
}

/// Everything the transport needs to perform one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: String,
    pub url: String,
    /// Connection-scoped protocol window; `None` keeps the transport default.
    pub security: Option<SecurityProtocols>,
    pub fields: RequestFields,
    /// Non-reserved headers in document order.
    pub headers: Vec<(String, String)>,
    /// `Some(Duration::ZERO)` means no limit; `None` defers to configuration.
    pub timeout: Option<Duration>,
    pub decompress: bool,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            security: None,
            fields: RequestFields::default(),
            headers: Vec::new(),
            timeout: None,
            decompress: true,
            body: None,
        }
    }

    /// `Name: value` lines sent verbatim. User-Agent, Referer, Range and
    /// If-Modified-Since have dedicated transport settings and are not listed.
    pub fn header_lines(&self) -> Vec<String> {
        let f = &self.fields;
        let mut lines = Vec::new();
        let mut slot = |name: &str, value: Option<String>| {
            if let Some(v) = value {
                lines.push(header_line(name, &v));
            }
        };
        slot("Accept", f.accept.clone());
        slot("Connection", f.connection.clone());
        slot("Content-Length", f.content_length.map(|n| n.to_string()));
        slot("Content-Type", f.content_type.clone());
        slot("Date", f.date.as_ref().map(http_date));
        slot("Expect", f.expect.clone());
        slot("Host", f.host.clone());
        slot("Transfer-Encoding", f.transfer_encoding.clone());
        for (name, value) in &self.headers {
            lines.push(header_line(name, value));
        }
        lines
    }
}

/// libcurl drops a header given as `Name:`; `Name;` sends it with an empty value.
fn header_line(name: &str, value: &str) -> String {
    let (name, value) = (name.trim(), value.trim());
    if value.is_empty() {
        format!("{};", name)
    } else {
        format!("{}: {}", name, value)
    }
}
