//! Aria Resolver
//!
//! Race-then-fallback resource resolution over remote music provider APIs.
//!
//! # Features
//!
//! - **Ranking**: concurrent liveness probes pick the two fastest providers
//! - **Racing**: the top two providers are queried concurrently; the first
//!   well-formed success cancels the loser
//! - **Fallback**: remaining providers in priority order, then generic
//!   aggregator endpoints
//! - **Remote config**: the provider list can be hot-replaced by a remote
//!   JSON document, validated wholesale
//!
//! # Example
//!
//! ```ignore
//! use aria_core::{MusicSource, Quality, ResourceKind, SongDescriptor};
//! use aria_resolver::{Resolver, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = Resolver::new(ResolverConfig::default())?;
//!     resolver.refresh_ranking().await;
//!
//!     let song = SongDescriptor::with_id("1005471336", "Some Song");
//!     let url = resolver
//!         .resolve(MusicSource::Wy, &song, &Quality::Q320k, ResourceKind::Url)
//!         .await?;
//!     println!("play {url}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod ranking;
mod request;
mod resolver;
mod response;

// Re-export main types
pub use config::{
    bundled_backup_apis, bundled_providers, fetch_remote_config, ProviderConfig, RankedProvider,
    RemoteConfigDoc, ResolverConfig, UrlFormat,
};
pub use error::{ResolveError, Result};
pub use ranking::{rank_providers, RankingOutcome, UpdateNotice};
pub use request::{build_aggregator_url, build_provider_url};
pub use resolver::Resolver;
pub use response::{classify, normalize_escaped_slashes, preprocess_lyric};
