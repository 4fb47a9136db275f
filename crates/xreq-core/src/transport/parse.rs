//! Parse captured response head lines (status line + headers).

/// Status line and headers of the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub protocol_version: String,
    pub status: Option<u32>,
    pub reason: String,
    pub headers: Vec<(String, String)>,
}

/// Parse collected header lines. A new status line (redirect hop, `100 Continue`)
/// starts over, so only the last response's head is returned.
pub(crate) fn parse_head(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(status_line) = parse_status_line(line) {
            head = status_line;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            head.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    head
}

/// `HTTP/1.1 404 Not Found` -> version `1.1`, status 404, reason `Not Found`.
fn parse_status_line(line: &str) -> Option<ResponseHead> {
    let rest = line.strip_prefix("HTTP/")?;
    let mut parts = rest.splitn(3, ' ');
    let version = parts.next()?.to_string();
    let status = parts.next()?.trim().parse::<u32>().ok()?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some(ResponseHead {
        protocol_version: version,
        status: Some(status),
        reason,
        headers: Vec::new(),
    })
}
