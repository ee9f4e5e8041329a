// src/models/mod.rs

//! Domain models for the archive client.
//!
//! Everything here is built fresh per response and is read-only afterwards.

mod config;
mod file;
mod item;
pub mod lenient;
mod media;
mod search;

// Re-export all public types
pub use config::{
    ClientConfig, Config, EndpointsConfig, SearchConfig, ServiceConfig, ServiceMode,
};
pub use file::ArchiveFile;
pub use item::{Item, ItemMetadata};
pub use media::{FileFormat, FileSource, MediaType, TopCollectionType};
pub use search::{CollectionTitle, SearchDoc, SearchResultPage};

pub(crate) use search::{AdvancedSearchEnvelope, AlternateSearchEnvelope};
