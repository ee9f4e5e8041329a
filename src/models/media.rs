//! Closed vocabularies used by item and file records.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::lenient::{self, KnownVariants};

/// Archive media type of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    Audio,
    Etree,
    Image,
    Movies,
    Texts,
    Collection,
    #[default]
    Other,
}

impl KnownVariants for MediaType {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("audio", MediaType::Audio),
        ("etree", MediaType::Etree),
        ("image", MediaType::Image),
        ("movies", MediaType::Movies),
        ("texts", MediaType::Texts),
        ("collection", MediaType::Collection),
    ];
    const UNKNOWN: Self = MediaType::Other;
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        lenient::spelling(*self).unwrap_or("other")
    }
}

/// Format tag of a single file, as reported in the `format` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    VbrMp3,
    Jpeg,
    Png,
    Tiff,
    OggVideo,
    H264,
    H264Hd,
    Mpeg2,
    Mpeg4Kb512,
    HiResMpeg4,
    Other,
}

impl KnownVariants for FileFormat {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("VBR MP3", FileFormat::VbrMp3),
        ("JPEG", FileFormat::Jpeg),
        ("PNG", FileFormat::Png),
        ("TIFF", FileFormat::Tiff),
        ("Ogg Video", FileFormat::OggVideo),
        ("h.264", FileFormat::H264),
        ("h.264 HD", FileFormat::H264Hd),
        ("MPEG2", FileFormat::Mpeg2),
        ("512Kb MPEG4", FileFormat::Mpeg4Kb512),
        ("HiRes MPEG4", FileFormat::HiResMpeg4),
    ];
    const UNKNOWN: Self = FileFormat::Other;
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        lenient::spelling(*self).unwrap_or("other")
    }

    /// The canonical audio format used for playback lists.
    pub fn is_audio(&self) -> bool {
        matches!(self, FileFormat::VbrMp3)
    }

    pub fn is_image(&self) -> bool {
        matches!(self, FileFormat::Jpeg | FileFormat::Png | FileFormat::Tiff)
    }

    pub fn is_video(&self) -> bool {
        matches!(
            self,
            FileFormat::OggVideo
                | FileFormat::H264
                | FileFormat::H264Hd
                | FileFormat::Mpeg2
                | FileFormat::Mpeg4Kb512
                | FileFormat::HiResMpeg4
        )
    }
}

/// Whether a file was uploaded or produced by the derivation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSource {
    Original,
    Derivative,
    Metadata,
    Other,
}

impl KnownVariants for FileSource {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("original", FileSource::Original),
        ("derivative", FileSource::Derivative),
        ("metadata", FileSource::Metadata),
    ];
    const UNKNOWN: Self = FileSource::Other;
}

impl FileSource {
    pub fn as_str(&self) -> &'static str {
        lenient::spelling(*self).unwrap_or("other")
    }
}

/// Top-level media collections that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopCollectionType {
    Audio,
    Movies,
    Texts,
}

impl TopCollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopCollectionType::Audio => "audio",
            TopCollectionType::Movies => "movies",
            TopCollectionType::Texts => "texts",
        }
    }
}

impl std::str::FromStr for TopCollectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(TopCollectionType::Audio),
            "movies" => Ok(TopCollectionType::Movies),
            "texts" => Ok(TopCollectionType::Texts),
            other => Err(format!("unknown collection type '{other}'")),
        }
    }
}

// --- serde glue shared by the vocabularies ---

macro_rules! vocabulary_serde {
    ($($ty:ty),*) => {$(
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                lenient::variant(deserializer)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

vocabulary_serde!(MediaType, FileFormat, FileSource);
