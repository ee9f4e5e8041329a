// src/views.rs

//! Derived read-only views over items, files and search docs.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::models::{ArchiveFile, FileSource, Item, SearchDoc};
use crate::utils::Endpoints;
use crate::utils::format;

fn by_track(mut files: Vec<&ArchiveFile>) -> Vec<&ArchiveFile> {
    files.sort_by_key(|file| file.cleaned_track().map_or((1, 0), |track| (0, track)));
    files
}

/// Thumbnail generated by the archive for every item.
pub const THUMBNAIL_NAME: &str = "__ia_thumb.jpg";

/// Album art above this size is replaced by the icon service image.
const MAX_ALBUM_ART_BYTES: u64 = 1_000_000;

impl Item {
    /// Files in the canonical audio format, in upstream order.
    pub fn audio_files(&self) -> Vec<&ArchiveFile> {
        self.files
            .iter()
            .filter(|file| file.format.is_some_and(|f| f.is_audio()))
            .collect()
    }

    /// Audio files, minus `78_` sides when the item belongs to `78rpm`.
    pub fn non78_audio(&self) -> Vec<&ArchiveFile> {
        let audio = self.audio_files();
        if !self.metadata.collection.iter().any(|c| c == "78rpm") {
            return audio;
        }
        audio
            .into_iter()
            .filter(|file| !file.name.contains("78_"))
            .collect()
    }

    /// Audio files ordered by track number; files without one keep their
    /// relative order at the end.
    pub fn sorted_audio_files(&self) -> Vec<&ArchiveFile> {
        by_track(self.audio_files())
    }

    /// [`Item::non78_audio`] ordered like [`Item::sorted_audio_files`].
    pub fn sorted_non78_audio(&self) -> Vec<&ArchiveFile> {
        by_track(self.non78_audio())
    }

    /// Original cover image if it is small enough, else the icon service.
    pub fn preferred_album_art(&self, endpoints: &Endpoints) -> Url {
        let candidate = self.files.iter().find(|file| {
            file.format.is_some_and(|f| f.is_image())
                && file.source == Some(FileSource::Original)
                && file.name != THUMBNAIL_NAME
        });

        match candidate {
            Some(file) if file.size_bytes().is_some_and(|size| size < MAX_ALBUM_ART_BYTES) => {
                file.download_url(endpoints)
            }
            _ => self.icon_url(endpoints),
        }
    }

    pub fn icon_url(&self, endpoints: &Endpoints) -> Url {
        endpoints.icon_url(self.identifier())
    }

    pub fn display_creator(&self) -> Option<String> {
        joined(&self.metadata.creator)
    }

    pub fn display_subject(&self) -> Option<String> {
        joined(&self.metadata.subject)
    }

    pub fn display_date(&self) -> String {
        self.metadata
            .date
            .as_deref()
            .map(format::medium_date)
            .unwrap_or_default()
    }

    /// Description paragraphs with markup stripped, separated by blank lines.
    pub fn plain_description(&self) -> String {
        plain_text(&self.metadata.description)
    }
}

impl ArchiveFile {
    /// Leading track number of `N` or `N/M`.
    pub fn cleaned_track(&self) -> Option<u32> {
        self.track.as_deref().and_then(clean_track)
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.trim().parse().ok())
    }

    /// File title, falling back to the file name.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn display_size(&self) -> Option<String> {
        self.size_bytes().map(format::size_string)
    }

    pub fn display_length(&self) -> Option<String> {
        self.length.as_deref().map(format::length_string)
    }

    pub fn download_url(&self, endpoints: &Endpoints) -> Url {
        endpoints.download_url(&self.identifier, &self.name)
    }
}

impl SearchDoc {
    pub fn display_creator(&self) -> Option<String> {
        joined(&self.creator)
    }

    pub fn display_subject(&self) -> Option<String> {
        joined(&self.subject)
    }

    pub fn display_date(&self) -> String {
        self.date
            .as_deref()
            .map(format::medium_date)
            .unwrap_or_default()
    }

    pub fn plain_description(&self) -> String {
        plain_text(&self.description)
    }

    pub fn icon_url(&self, endpoints: &Endpoints) -> Url {
        endpoints.icon_url(&self.identifier)
    }
}

/// Parse a track designator: plain integer first, then the part before `/`.
pub fn clean_track(raw: &str) -> Option<u32> {
    if let Ok(track) = raw.parse() {
        return Some(track);
    }
    raw.split('/').next()?.trim().parse().ok()
}

fn joined(values: &[String]) -> Option<String> {
    (!values.is_empty()).then(|| values.join(", "))
}

fn plain_text(paragraphs: &[String]) -> String {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").ok());

    paragraphs
        .iter()
        .map(|p| match tags {
            Some(re) => re.replace_all(p, "").trim().to_string(),
            None => p.trim().to_string(),
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileFormat, ItemMetadata, MediaType};

    fn file(name: &str, format: FileFormat) -> ArchiveFile {
        ArchiveFile {
            identifier: "item".into(),
            creator: Vec::new(),
            item_title: None,
            artist: None,
            name: name.into(),
            title: None,
            track: None,
            size: None,
            length: None,
            format: Some(format),
            source: None,
        }
    }

    fn item(collections: &[&str], files: Vec<ArchiveFile>) -> Item {
        let mut metadata = ItemMetadata::new("item", MediaType::Audio);
        metadata.collection = collections.iter().map(|c| c.to_string()).collect();
        Item {
            metadata,
            files,
            collection_archives: Vec::new(),
        }
    }

    fn names(files: &[&ArchiveFile]) -> Vec<String> {
        files.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_clean_track() {
        assert_eq!(clean_track("3"), Some(3));
        assert_eq!(clean_track("3/12"), Some(3));
        assert_eq!(clean_track(" 4 /9"), Some(4));
        assert_eq!(clean_track("abc"), None);
        assert_eq!(clean_track(""), None);
    }

    #[test]
    fn test_audio_files_filter_format() {
        let item = item(
            &[],
            vec![
                file("a.mp3", FileFormat::VbrMp3),
                file("a.png", FileFormat::Png),
                file("b.mp3", FileFormat::VbrMp3),
            ],
        );
        assert_eq!(names(&item.audio_files()), vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn test_non78_audio_in_78rpm_collection() {
        let item = item(
            &["78rpm", "audio"],
            vec![
                file("side_a.mp3", FileFormat::VbrMp3),
                file("78_side_b.mp3", FileFormat::VbrMp3),
                file("disc_78_c.mp3", FileFormat::VbrMp3),
            ],
        );
        assert_eq!(names(&item.non78_audio()), vec!["side_a.mp3"]);
    }

    #[test]
    fn test_non78_audio_outside_78rpm_is_unchanged() {
        let item = item(
            &["78rpm_extra"],
            vec![
                file("78_side_b.mp3", FileFormat::VbrMp3),
                file("cover.jpg", FileFormat::Jpeg),
            ],
        );
        assert_eq!(names(&item.non78_audio()), names(&item.audio_files()));
    }

    #[test]
    fn test_sorted_audio_files_puts_untracked_last() {
        let mut first = file("first.mp3", FileFormat::VbrMp3);
        first.track = Some("2/3".into());
        let mut second = file("second.mp3", FileFormat::VbrMp3);
        second.track = Some("1".into());
        let untracked = file("untracked.mp3", FileFormat::VbrMp3);
        let mut junk = file("junk.mp3", FileFormat::VbrMp3);
        junk.track = Some("side A".into());

        let item = item(&[], vec![untracked, first, junk, second]);
        assert_eq!(
            names(&item.sorted_audio_files()),
            vec!["second.mp3", "first.mp3", "untracked.mp3", "junk.mp3"]
        );
    }

    #[test]
    fn test_sorted_non78_audio() {
        let mut later = file("later.mp3", FileFormat::VbrMp3);
        later.track = Some("3".into());
        let mut side = file("78_side.mp3", FileFormat::VbrMp3);
        side.track = Some("1".into());
        let mut opener = file("opener.mp3", FileFormat::VbrMp3);
        opener.track = Some("2".into());

        let item = item(&["78rpm"], vec![later, side, opener]);
        assert_eq!(
            names(&item.sorted_non78_audio()),
            vec!["opener.mp3", "later.mp3"]
        );
    }

    #[test]
    fn test_album_art_prefers_small_original() {
        let endpoints = Endpoints::default();
        let mut thumb = file(THUMBNAIL_NAME, FileFormat::Jpeg);
        thumb.source = Some(FileSource::Original);
        thumb.size = Some("100".into());
        let mut derived = file("derived.jpg", FileFormat::Jpeg);
        derived.source = Some(FileSource::Derivative);
        derived.size = Some("100".into());
        let mut cover = file("cover art.jpg", FileFormat::Jpeg);
        cover.source = Some(FileSource::Original);
        cover.size = Some("999999".into());

        let item = item(&[], vec![thumb, derived, cover]);
        assert_eq!(
            item.preferred_album_art(&endpoints).as_str(),
            "https://archive.org/download/item/cover%20art.jpg"
        );
    }

    #[test]
    fn test_album_art_falls_back_to_icon() {
        let endpoints = Endpoints::default();
        let mut big = file("big.png", FileFormat::Png);
        big.source = Some(FileSource::Original);
        big.size = Some("1000000".into());
        let mut small = file("small.png", FileFormat::Png);
        small.source = Some(FileSource::Original);
        small.size = Some("10".into());

        // Only the first candidate is considered.
        let covered = item(&[], vec![big, small]);
        assert_eq!(
            covered.preferred_album_art(&endpoints).as_str(),
            "https://archive.org/services/img/item"
        );

        let empty = item(&[], Vec::new());
        assert_eq!(
            empty.preferred_album_art(&endpoints),
            empty.icon_url(&endpoints)
        );
    }

    #[test]
    fn test_album_art_unparseable_size_uses_icon() {
        let endpoints = Endpoints::default();
        let mut cover = file("cover.jpg", FileFormat::Jpeg);
        cover.source = Some(FileSource::Original);
        cover.size = Some("unknown".into());
        let item = item(&[], vec![cover]);
        assert_eq!(item.preferred_album_art(&endpoints), item.icon_url(&endpoints));
    }

    #[test]
    fn test_file_display_helpers() {
        let mut f = file("01.mp3", FileFormat::VbrMp3);
        assert_eq!(f.display_name(), "01.mp3");
        assert_eq!(f.display_size(), None);

        f.title = Some("Opening".into());
        f.size = Some("1234567".into());
        f.length = Some("65:05".into());
        assert_eq!(f.display_name(), "Opening");
        assert_eq!(f.display_size().as_deref(), Some("1.23"));
        assert_eq!(f.display_length().as_deref(), Some("01:05:05"));
    }

    #[test]
    fn test_plain_description_strips_markup() {
        let mut item = item(&[], Vec::new());
        item.metadata.description = vec![
            "<p>Recorded <b>live</b>.</p>".into(),
            "  ".into(),
            "Second <a href=\"x\">paragraph</a>".into(),
        ];
        assert_eq!(
            item.plain_description(),
            "Recorded live.\n\nSecond paragraph"
        );
    }

    #[test]
    fn test_display_creator_joins() {
        let mut item = item(&[], Vec::new());
        assert_eq!(item.display_creator(), None);
        item.metadata.creator = vec!["A".into(), "B".into()];
        assert_eq!(item.display_creator().as_deref(), Some("A, B"));
    }
}
