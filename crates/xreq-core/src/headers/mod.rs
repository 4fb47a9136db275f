//! Header mapper: `<Headers><Header Name="..">value</Header>...</Headers>`.
//!
//! Headers are decoded in document order, then routed: reserved names go to a
//! typed request field, everything else is kept as a generic `(name, value)`
//! pair with duplicates preserved.

mod reserved;

pub use reserved::{is_reserved, ByteRange, RequestFields};
pub(crate) use reserved::{http_date, parse_date};

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::error::RequestError;

/// Every child element of the root, whatever its tag, in document order.
struct HeaderEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for HeaderEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = HeaderEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a root element whose children carry a Name attribute")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            // Root attributes (`@x`) and stray root text (`$text`).
            if key.starts_with('@') || key.starts_with('$') {
                map.next_value::<IgnoredAny>()?;
                continue;
            }
            let entry: HeaderEntry = map.next_value()?;
            pairs.push((entry.name, entry.value));
        }
        Ok(HeaderEntries(pairs))
    }
}

#[derive(Debug, Deserialize)]
struct HeaderEntry {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "$text", default)]
    value: String,
}

/// Ordered `(name, value)` pairs from the headers document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    pairs: Vec<(String, String)>,
}

impl HeaderSet {
    /// Parse a headers document. Absent or blank input yields an empty set.
    pub fn parse(doc: Option<&str>) -> Result<Self, RequestError> {
        let doc = match doc {
            Some(d) if !d.trim().is_empty() => d,
            _ => return Ok(Self::default()),
        };
        let parsed: HeaderEntries =
            quick_xml::de::from_str(doc).map_err(RequestError::MalformedHeadersDocument)?;
        Ok(Self { pairs: parsed.0 })
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Route every pair to its request field or to the generic collection.
    /// Names must be header tokens and values must not break the header line.
    pub fn map(&self) -> Result<MappedHeaders, RequestError> {
        let mut mapped = MappedHeaders::default();
        for (name, value) in &self.pairs {
            check_wire_safe(name, value).map_err(|reason| RequestError::HeaderValueConversion {
                name: name.clone(),
                value: value.clone(),
                reason: reason.to_string(),
            })?;
            match reserved::setter_for(name) {
                Some(set) => set(&mut mapped.fields, value).map_err(|reason| {
                    RequestError::HeaderValueConversion {
                        name: name.clone(),
                        value: value.clone(),
                        reason,
                    }
                })?,
                None => mapped.generic.push((name.clone(), value.clone())),
            }
        }
        tracing::debug!(
            reserved = self.pairs.len() - mapped.generic.len(),
            generic = mapped.generic.len(),
            "mapped request headers"
        );
        Ok(mapped)
    }
}

fn check_wire_safe(name: &str, value: &str) -> Result<(), &'static str> {
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return Err("header name is not a valid token");
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err("header value contains CR, LF or NUL");
    }
    Ok(())
}

// tchar from RFC 9110 section 5.6.2.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Headers after routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedHeaders {
    pub fields: RequestFields,
    /// Non-reserved headers, in document order, duplicates kept.
    pub generic: Vec<(String, String)>,
}

impl MappedHeaders {
    /// True when `Content-Length` came from the headers document.
    pub fn content_length_supplied(&self) -> bool {
        self.fields.content_length.is_some()
    }

    /// True when `Content-Type` came from the headers document.
    pub fn content_type_supplied(&self) -> bool {
        self.fields.content_type.is_some()
    }
}
