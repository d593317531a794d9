//! Error kinds for the arbitrage engine's external and internal boundaries.

use thiserror::Error;

/// Fatal at startup.
#[derive(Debug, Error)]
pub enum ArbError {
    #[error("config file not found at {path}")]
    ConfigMissing { path: String },

    #[error("malformed config at {path}: {source}")]
    ConfigMalformed {
        path: String,
        #[source]
        source: figment::Error,
    },
}

/// Non-fatal failures a feed can encounter while streaming. These never
/// escape the feed: they are logged and handled in place.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to parse message: {0}")]
    Parse(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("connection closed unexpectedly")]
    UnexpectedClose,

    #[error("subscribe called before connect")]
    SubscribeBeforeConnect,
}
