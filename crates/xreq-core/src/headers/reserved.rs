//! Reserved header names and their typed request fields.
//!
//! These names are not sent as free-form headers: each one has a dedicated
//! slot (and, for some, a conversion) on the outbound request.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Inclusive byte range from a `Range: start-end` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (a, b) = raw
            .split_once('-')
            .ok_or_else(|| "expected start-end".to_string())?;
        let start: u64 = a.trim().parse().map_err(|e| format!("start: {}", e))?;
        let end: u64 = b.trim().parse().map_err(|e| format!("end: {}", e))?;
        if start > end {
            return Err(format!("start {} is after end {}", start, end));
        }
        Ok(Self { start, end })
    }
}

/// Typed request fields fed by reserved headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFields {
    pub accept: Option<String>,
    pub connection: Option<String>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub expect: Option<String>,
    pub host: Option<String>,
    pub if_modified_since: Option<DateTime<Utc>>,
    pub range: Option<ByteRange>,
    pub referer: Option<String>,
    pub transfer_encoding: Option<String>,
    pub user_agent: Option<String>,
}

type Setter = fn(&mut RequestFields, &str) -> Result<(), String>;

/// Name to setter. Names match exactly (case-sensitive).
const RESERVED: [(&str, Setter); 12] = [
    ("Accept", set_accept),
    ("Connection", set_connection),
    ("Content-Length", set_content_length),
    ("Content-Type", set_content_type),
    ("Date", set_date),
    ("Expect", set_expect),
    ("Host", set_host),
    ("If-Modified-Since", set_if_modified_since),
    ("Range", set_range),
    ("Referer", set_referer),
    ("Transfer-Encoding", set_transfer_encoding),
    ("User-Agent", set_user_agent),
];

pub fn is_reserved(name: &str) -> bool {
    setter_for(name).is_some()
}

pub(super) fn setter_for(name: &str) -> Option<Setter> {
    RESERVED
        .iter()
        .find(|(reserved, _)| *reserved == name)
        .map(|(_, setter)| *setter)
}

fn set_accept(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.accept = Some(v.to_string());
    Ok(())
}

fn set_connection(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.connection = Some(v.to_string());
    Ok(())
}

fn set_content_length(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.content_length = Some(v.trim().parse::<u64>().map_err(|e| e.to_string())?);
    Ok(())
}

fn set_content_type(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.content_type = Some(v.to_string());
    Ok(())
}

fn set_date(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.date = Some(parse_date(v)?);
    Ok(())
}

fn set_expect(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.expect = Some(v.to_string());
    Ok(())
}

fn set_host(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.host = Some(v.to_string());
    Ok(())
}

fn set_if_modified_since(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.if_modified_since = Some(parse_date(v)?);
    Ok(())
}

fn set_range(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.range = Some(ByteRange::parse(v)?);
    Ok(())
}

fn set_referer(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.referer = Some(v.to_string());
    Ok(())
}

fn set_transfer_encoding(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.transfer_encoding = Some(v.to_string());
    Ok(())
}

fn set_user_agent(f: &mut RequestFields, v: &str) -> Result<(), String> {
    f.user_agent = Some(v.to_string());
    Ok(())
}

/// Parse a timestamp: HTTP-date / RFC 2822, RFC 3339, or a plain date(-time) taken as UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| "unrecognized date format".to_string())
}

/// HTTP-date (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub(crate) fn http_date(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
