//! Error types for the plugin surface.

use thiserror::Error;

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors surfaced to the host.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Request rejected before any I/O
    #[error(transparent)]
    Core(#[from] aria_core::CoreError),

    /// Resolution failed
    #[error(transparent)]
    Resolve(#[from] aria_resolver::ResolveError),

    /// The host stopped draining outbound events
    #[error("host event channel closed")]
    ChannelClosed,
}
