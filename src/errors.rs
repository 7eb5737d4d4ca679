use crate::config::ConfigError;

/// Failure of an optional or platform specific native lookup.
///
/// These never escape the crate: whoever receives one logs it and carries on as if
/// the handle was simply not available yet.
#[derive(Debug, thiserror::Error)]
pub enum PlatformLookupError {
    #[error("native API not available: {0}")]
    ApiUnavailable(String),

    #[error("visual has no native peer")]
    NoPeer,

    #[error("native lookup failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("Unsupported in this embedding mode: {0}")]
    Unsupported(String),

    #[error("Browser host is closed")]
    Closed,

    #[error("Platform lookup failed: {0}")]
    PlatformLookup(#[from] PlatformLookupError),

    #[error("Engine call failed: {0}")]
    EngineCall(#[source] anyhow::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
