use std::net::SocketAddr;
use stockcorr_feed::FeedConfig;
use tracing::warn;

/// Dashboard server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// WebSocket listen address (`WS_ADDR`)
    pub addr: SocketAddr,
    /// Broadcast buffer per subscriber (`WS_BUFFER_SIZE`)
    pub buffer_size: usize,
    pub feed: FeedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 9002)),
            buffer_size: 1024,
            feed: FeedConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let addr = match lookup("WS_ADDR") {
            Some(value) => value.trim().parse::<SocketAddr>().unwrap_or_else(|error| {
                warn!(%error, %value, "ignoring malformed WS_ADDR");
                defaults.addr
            }),
            None => defaults.addr,
        };

        let buffer_size = lookup("WS_BUFFER_SIZE")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.buffer_size);

        Self {
            addr,
            buffer_size,
            feed: FeedConfig::from_lookup(&lookup),
        }
    }
}
