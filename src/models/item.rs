//! Archive item model and its construction from a metadata document.

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::models::file::{ArchiveFile, FileRecord};
use crate::models::lenient;
use crate::models::media::MediaType;
use crate::utils::json;

/// Descriptive metadata of an archive item.
///
/// `identifier` and `mediatype` are mandatory; everything else degrades to
/// empty or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub identifier: String,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub creator: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub subject: Vec<String>,

    /// Description paragraphs, usually HTML
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub description: Vec<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub uploader: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub publisher: Vec<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub artist: Option<String>,

    #[serde(rename = "mediatype")]
    pub media_type: MediaType,

    /// Identifiers of the collections this item belongs to
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub collection: Vec<String>,
}

impl ItemMetadata {
    /// Create metadata with only the mandatory fields set.
    pub fn new(identifier: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            creator: Vec::new(),
            subject: Vec::new(),
            description: Vec::new(),
            uploader: None,
            publisher: Vec::new(),
            date: None,
            artist: None,
            media_type,
            collection: Vec::new(),
        }
    }
}

/// Raw `GET /metadata/<identifier>` document.
#[derive(Debug, Deserialize)]
struct ItemDocument {
    metadata: ItemMetadata,

    #[serde(default)]
    files: Option<Vec<FileRecord>>,
}

/// A single archive entry with its files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub metadata: ItemMetadata,

    pub files: Vec<ArchiveFile>,

    /// Collections this item belongs to, when resolved
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collection_archives: Vec<Item>,
}

impl Item {
    /// Decode a metadata document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let document: ItemDocument = json::decode(bytes)?;
        Self::from_document(document)
    }

    fn from_document(document: ItemDocument) -> Result<Self> {
        let metadata = document.metadata;
        if metadata.identifier.trim().is_empty() {
            return Err(ArchiveError::decoding("metadata.identifier: empty identifier"));
        }

        let files = document
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|record| ArchiveFile::from_record(record, &metadata))
            .collect();

        Ok(Self {
            metadata,
            files,
            collection_archives: Vec::new(),
        })
    }

    /// Build a file-less collection item from an identifier and optional title.
    pub fn collection_stub(identifier: impl Into<String>, title: Option<String>) -> Self {
        let identifier = identifier.into();
        let mut metadata = ItemMetadata::new(identifier.clone(), MediaType::Collection);
        metadata.title = Some(title.unwrap_or(identifier));

        Self {
            metadata,
            files: Vec::new(),
            collection_archives: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.metadata.identifier
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }
}
