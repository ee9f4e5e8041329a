//! File entries belonging to an item.

use serde::{Deserialize, Serialize};

use crate::models::item::ItemMetadata;
use crate::models::lenient;
use crate::models::media::{FileFormat, FileSource};

/// A file entry exactly as it appears in the `files` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FileRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub track: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub size: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub length: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_variant")]
    pub format: Option<FileFormat>,

    #[serde(default, deserialize_with = "lenient::optional_variant")]
    pub source: Option<FileSource>,
}

/// One downloadable asset of an item.
///
/// Carries a copy of the owning item's identifier, creators, title and artist
/// so it can be handed around (and turned into a download URL) on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveFile {
    /// Identifier of the owning item
    pub identifier: String,

    /// Creators of the owning item
    pub creator: Vec<String>,

    /// Title of the owning item
    pub item_title: Option<String>,

    /// Artist of the owning item
    pub artist: Option<String>,

    /// File name, relative to the item directory
    pub name: String,

    /// Display title of the file
    pub title: Option<String>,

    /// Track designator, `N` or `N/M`
    pub track: Option<String>,

    /// Size in bytes, as a decimal string
    pub size: Option<String>,

    /// Length as seconds, `MM:SS` or `HH:MM:SS`
    pub length: Option<String>,

    pub format: Option<FileFormat>,

    pub source: Option<FileSource>,
}

impl ArchiveFile {
    pub(crate) fn from_record(record: FileRecord, metadata: &ItemMetadata) -> Self {
        Self {
            identifier: metadata.identifier.clone(),
            creator: metadata.creator.clone(),
            item_title: metadata.title.clone(),
            artist: metadata.artist.clone(),
            name: record.name,
            title: record.title,
            track: record.track,
            size: record.size,
            length: record.length,
            format: record.format,
            source: record.source,
        }
    }
}
