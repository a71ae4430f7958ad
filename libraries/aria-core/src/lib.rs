//! Aria Core
//!
//! Platform-agnostic domain types and error handling for the Aria source
//! resolver.
//!
//! The core crate defines:
//! - **Domain Types**: `MusicSource`, `Quality`, `SongDescriptor`, `ResourceKind`
//! - **Catalogue**: the per-source capability listing advertised to the host
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use aria_core::{MusicSource, Quality, SongDescriptor};
//!
//! let song = SongDescriptor::with_id("10086", "Some Song");
//! assert_eq!(song.resolved_id().unwrap(), "10086");
//!
//! let quality: Quality = "320k".parse().unwrap();
//! assert_eq!(quality.aggregator_bitrate(), "320");
//!
//! let source = MusicSource::from_code("wy").unwrap();
//! assert_eq!(source.aggregator_name(), "netease");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{
    default_catalog, CatalogEntry, MusicSource, Quality, ResourceKind, SongDescriptor,
};
