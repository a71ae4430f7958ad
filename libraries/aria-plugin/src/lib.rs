//! Host integration layer.
//!
//! Wraps [`aria_resolver::Resolver`] in the event protocol a player host
//! speaks: inbound `request` events asking for a stream URL, cover art or
//! lyrics, and outbound `inited` and `updateAlert` events.

#![forbid(unsafe_code)]

mod error;
mod events;
mod plugin;

pub use error::{PluginError, Result};
pub use events::{
    combine_notices, InitedPayload, OutboundEvent, RequestEvent, RequestInfo, UpdateAlert,
};
pub use plugin::SourcePlugin;
