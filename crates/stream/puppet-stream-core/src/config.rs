use serde::{Deserialize, Serialize};

use crate::backoff::BackoffConfig;
use crate::endpoint::{Endpoint, PageLocation, DEFAULT_PORT};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub location: PageLocation,
    pub port: u16,
    pub backoff: BackoffConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            location: PageLocation::default(),
            port: DEFAULT_PORT,
            backoff: BackoffConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Loopback on the default port with a custom page host, e.g. for a LAN producer.
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            location: PageLocation {
                protocol: None,
                hostname: Some(hostname.into()),
            },
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::derive(&self.location, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = StreamConfig::default();
        assert_eq!(cfg.endpoint().url(), "ws://127.0.0.1:8765");
        assert_eq!(StreamConfig::for_host("10.0.0.5").endpoint().url(), "ws://10.0.0.5:8765");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: StreamConfig =
            serde_json::from_str(r#"{ "location": { "protocol": "https:", "hostname": "h" } }"#)
                .unwrap();
        assert_eq!(cfg.endpoint().url(), "wss://h:8765");
        assert_eq!(cfg.backoff, BackoffConfig::default());
    }
}
