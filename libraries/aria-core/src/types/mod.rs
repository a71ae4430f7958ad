//! Domain types for the Aria source resolver

mod catalog;
mod quality;
mod resource;
mod song;
mod source;

pub use catalog::{default_catalog, CatalogEntry};
pub use quality::Quality;
pub use resource::ResourceKind;
pub use song::SongDescriptor;
pub use source::MusicSource;
