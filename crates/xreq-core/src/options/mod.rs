//! Option parser: `<Options><timeout>300000</timeout>...</Options>` into a flat map.
//!
//! Values stay strings here. Each consumer coerces its own option through the
//! typed accessors below, so a malformed value only fails where it is used.

mod security;

pub use security::SecurityProtocols;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::RequestError;

pub const SECURITY_PROTOCOL: &str = "security_protocol";
pub const TIMEOUT: &str = "timeout";
pub const AUTO_DECOMPRESS: &str = "auto_decompress";
pub const CONVERT_RESPONSE_TO_BASE64: &str = "convert_response_to_base64";
pub const DEBUG: &str = "debug";

/// Parsed options document: option name to raw string value. Unknown names are kept but unused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: HashMap<String, String>,
}

impl OptionSet {
    /// Parse an options document. Absent or blank input yields an empty set.
    pub fn parse(doc: Option<&str>) -> Result<Self, RequestError> {
        let doc = match doc {
            Some(d) if !d.trim().is_empty() => d,
            _ => return Ok(Self::default()),
        };
        let entries: OptionEntries =
            quick_xml::de::from_str(doc).map_err(RequestError::MalformedOptionsDocument)?;
        Ok(Self { values: entries.0 })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `security_protocol`: union of the listed protocols, if the option is present.
    pub fn security_protocols(&self) -> Result<Option<SecurityProtocols>, RequestError> {
        self.get(SECURITY_PROTOCOL)
            .map(SecurityProtocols::parse_list)
            .transpose()
    }

    /// `timeout` in milliseconds, if present. `-1` and `0` both mean no limit and
    /// come back as `Duration::ZERO`.
    pub fn timeout(&self) -> Result<Option<Duration>, RequestError> {
        let Some(raw) = self.get(TIMEOUT) else {
            return Ok(None);
        };
        let invalid = || RequestError::InvalidOptionValue {
            name: TIMEOUT,
            value: raw.to_string(),
            expected: "milliseconds as a 32-bit integer, or -1",
        };
        let ms: i32 = raw.trim().parse().map_err(|_| invalid())?;
        match ms {
            -1 | 0 => Ok(Some(Duration::ZERO)),
            ms if ms > 0 => Ok(Some(Duration::from_millis(ms.unsigned_abs().into()))),
            _ => Err(invalid()),
        }
    }

    /// `auto_decompress`, default `true`.
    pub fn auto_decompress(&self) -> Result<bool, RequestError> {
        self.flag(AUTO_DECOMPRESS, true)
    }

    /// `convert_response_to_base64`, default `false`.
    pub fn convert_response_to_base64(&self) -> Result<bool, RequestError> {
        self.flag(CONVERT_RESPONSE_TO_BASE64, false)
    }

    /// `debug`, default `false`.
    pub fn debug(&self) -> Result<bool, RequestError> {
        self.flag(DEBUG, false)
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, RequestError> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => parse_bool(raw).ok_or_else(|| RequestError::InvalidOptionValue {
                name,
                value: raw.to_string(),
                expected: "true or false",
            }),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Children of the root element as a flat, duplicate-free map.
struct OptionEntries(HashMap<String, String>);

impl<'de> Deserialize<'de> for OptionEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = OptionEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a root element with flat option elements")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut values = HashMap::new();
        while let Some(key) = map.next_key::<String>()? {
            // Root attributes (`@x`) and stray root text (`$text`).
            if key.starts_with('@') || key.starts_with('$') {
                map.next_value::<IgnoredAny>()?;
                continue;
            }
            let value: String = map.next_value()?;
            if values.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate option '{}'", key)));
            }
            values.insert(key, value);
        }
        Ok(OptionEntries(values))
    }
}
