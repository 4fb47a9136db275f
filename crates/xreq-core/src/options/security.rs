//! Security protocol selection (`security_protocol` option).
//!
//! The comma-joined names are combined into one set. The set is applied to the
//! single request being built, as a minimum/maximum TLS version window on its
//! own curl handle; nothing process-wide is touched.

use bitflags::bitflags;
use curl::easy::SslVersion;

use crate::error::RequestError;

bitflags! {
    /// Acceptable transport security protocol versions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SecurityProtocols: u32 {
        const SSL3 = 0x0030;
        const TLS = 0x00C0;
        const TLS11 = 0x0300;
        const TLS12 = 0x0C00;
        const TLS13 = 0x3000;
    }
}

const NAMES: [(&str, SecurityProtocols); 6] = [
    ("SystemDefault", SecurityProtocols::empty()),
    ("Ssl3", SecurityProtocols::SSL3),
    ("Tls", SecurityProtocols::TLS),
    ("Tls11", SecurityProtocols::TLS11),
    ("Tls12", SecurityProtocols::TLS12),
    ("Tls13", SecurityProtocols::TLS13),
];

// Lowest first; used to derive the version window.
const ORDERED: [SecurityProtocols; 5] = [
    SecurityProtocols::SSL3,
    SecurityProtocols::TLS,
    SecurityProtocols::TLS11,
    SecurityProtocols::TLS12,
    SecurityProtocols::TLS13,
];

impl SecurityProtocols {
    /// Parse `Tls12,Tls11,Tls` (names or decimal bit values) into their union.
    pub fn parse_list(raw: &str) -> Result<Self, RequestError> {
        let mut set = SecurityProtocols::empty();
        for part in raw.split(',') {
            set |= parse_one(part.trim())?;
        }
        Ok(set)
    }

    /// (min, max) TLS version window covering every selected protocol.
    /// `None` for the empty set: leave the transport default in place.
    pub fn version_window(&self) -> Option<(SslVersion, SslVersion)> {
        let mut selected = ORDERED.iter().filter(|flag| self.contains(**flag));
        let min = *selected.next()?;
        let max = selected.last().copied().unwrap_or(min);
        Some((ssl_version(min), ssl_version(max)))
    }
}

fn parse_one(name: &str) -> Result<SecurityProtocols, RequestError> {
    if let Some((_, flag)) = NAMES.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        return Ok(*flag);
    }
    name.parse::<u32>()
        .ok()
        .and_then(SecurityProtocols::from_bits)
        .filter(|set| ORDERED.iter().all(|flag| set.contains(*flag) || !set.intersects(*flag)))
        .ok_or_else(|| RequestError::UnknownSecurityProtocol(name.to_string()))
}

fn ssl_version(flag: SecurityProtocols) -> SslVersion {
    if flag == SecurityProtocols::SSL3 {
        SslVersion::Sslv3
    } else if flag == SecurityProtocols::TLS {
        SslVersion::Tlsv10
    } else if flag == SecurityProtocols::TLS11 {
        SslVersion::Tlsv11
    } else if flag == SecurityProtocols::TLS12 {
        SslVersion::Tlsv12
    } else {
        SslVersion::Tlsv13
    }
}
