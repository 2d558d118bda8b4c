//! Pose source endpoint derived from the hosting page's address.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8765;
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// The parts of the hosting page's location the endpoint depends on.
///
/// Native hosts without a page leave both fields unset and get a plain
/// loopback connection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    /// Page scheme including the trailing colon, e.g. `https:`.
    pub protocol: Option<String>,
    pub hostname: Option<String>,
}

impl PageLocation {
    pub fn new(protocol: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            protocol: Some(protocol.into()),
            hostname: Some(hostname.into()),
        }
    }

    fn is_secure(&self) -> bool {
        matches!(self.protocol.as_deref(), Some("https:") | Some("https"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub secure: bool,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// `wss` for secure pages, `ws` otherwise; loopback when the page has no host.
    pub fn derive(location: &PageLocation, port: u16) -> Self {
        let host = location
            .hostname
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(LOOPBACK_HOST)
            .to_string();
        Self {
            secure: location.is_secure(),
            host,
            port,
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }

    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme(), self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_page_uses_ws_on_page_host() {
        let loc = PageLocation::new("http:", "192.168.1.20");
        assert_eq!(
            Endpoint::derive(&loc, DEFAULT_PORT).url(),
            "ws://192.168.1.20:8765"
        );
    }

    #[test]
    fn secure_page_uses_wss() {
        let loc = PageLocation::new("https:", "puppet.example.org");
        assert_eq!(
            Endpoint::derive(&loc, DEFAULT_PORT).url(),
            "wss://puppet.example.org:8765"
        );
    }

    #[test]
    fn missing_or_empty_host_falls_back_to_loopback() {
        assert_eq!(
            Endpoint::derive(&PageLocation::default(), DEFAULT_PORT).url(),
            "ws://127.0.0.1:8765"
        );
        let file_page = PageLocation::new("file:", "");
        assert_eq!(
            Endpoint::derive(&file_page, DEFAULT_PORT).url(),
            "ws://127.0.0.1:8765"
        );
    }
}
