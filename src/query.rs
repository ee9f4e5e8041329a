// src/query.rs

//! Search query construction for the advancedsearch and page production backends.
//!
//! User text is interpolated as-is; characters with meaning in the backend
//! query language are not escaped.

use crate::models::{FileFormat, MediaType, TopCollectionType};

/// Which fields the free text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    All,
    Creator,
}

/// Caller-facing search parameters shared by both backends.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub text: String,
    pub field: SearchField,
    pub media_types: Vec<MediaType>,
    pub format: Option<FileFormat>,
    pub collection: Option<String>,
    pub rows: u32,
    pub page: u32,
}

impl SearchRequest {
    /// All-fields search over audio and etree, 50 rows, first page.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field: SearchField::All,
            media_types: vec![MediaType::Audio, MediaType::Etree],
            format: None,
            collection: None,
            rows: 50,
            page: 1,
        }
    }

    pub fn field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    pub fn media_types(mut self, media_types: Vec<MediaType>) -> Self {
        self.media_types = media_types;
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// True when the text has nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A ready-to-send advancedsearch query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedQuery {
    pub query: String,
    pub rows: u32,
    pub page: u32,
}

impl AdvancedQuery {
    /// `q=<query>&output=json&rows=<n>&page=<p>`, query text unescaped.
    pub fn form_body(&self) -> String {
        format!(
            "q={}&output=json&rows={}&page={}",
            self.query, self.rows, self.page
        )
    }
}

/// A ready-to-send page production query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateQuery {
    pub user_query: String,
    pub hits_per_page: u32,
    pub page: u32,
}

impl AlternateQuery {
    /// URL query pairs, in the order they are appended.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("user_query", self.user_query.clone()),
            ("hits_per_page", self.hits_per_page.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// Builds backend queries with a fixed collection exclusion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    excluded_collections: Vec<String>,
}

impl QueryBuilder {
    pub fn new(excluded_collections: Vec<String>) -> Self {
        Self {
            excluded_collections,
        }
    }

    pub fn excluded_collections(&self) -> &[String] {
        &self.excluded_collections
    }

    /// Query for the advancedsearch backend, or `None` for empty text.
    pub fn advanced(&self, request: &SearchRequest) -> Option<AdvancedQuery> {
        if request.is_empty() {
            return None;
        }

        let base = match request.field {
            SearchField::All => boosted_terms(&request.text),
            SearchField::Creator => format!("creator:{}", request.text),
        };

        Some(AdvancedQuery {
            query: self.assemble(base, request, false),
            rows: request.rows,
            page: request.page,
        })
    }

    /// Query for the page production backend, or `None` for empty text.
    ///
    /// All-fields text is passed through unboosted; this backend ranks on
    /// its own.
    pub fn alternate(&self, request: &SearchRequest) -> Option<AlternateQuery> {
        if request.is_empty() {
            return None;
        }

        let base = match request.field {
            SearchField::All => request.text.clone(),
            SearchField::Creator => format!("creator:{}", request.text),
        };

        Some(AlternateQuery {
            user_query: self.assemble(base, request, true),
            hits_per_page: request.rows,
            page: request.page,
        })
    }

    /// Listing query for the top-level collections of one media kind.
    pub fn top_collections(&self, kind: TopCollectionType, rows: u32) -> AdvancedQuery {
        AdvancedQuery {
            query: format!(
                "mediatype:collection AND NOT hidden:true AND collection:{}",
                kind.as_str()
            ),
            rows,
            page: 1,
        }
    }

    fn assemble(&self, base: String, request: &SearchRequest, exclude_restricted: bool) -> String {
        let mut query = base;

        for collection in &self.excluded_collections {
            query.push_str(" AND NOT collection:");
            query.push_str(collection);
        }
        if exclude_restricted {
            query.push_str(" AND NOT access-restricted-item:true");
        }

        if !request.media_types.is_empty() {
            let media = request
                .media_types
                .iter()
                .map(|m| format!("mediaType:{m}"))
                .collect::<Vec<_>>()
                .join(" OR ");
            query.push_str(&format!(" AND ({media})"));
        }
        if let Some(format) = request.format {
            query.push_str(&format!(" AND format:\"{format}\""));
        }
        if let Some(collection) = &request.collection {
            query.push_str(&format!(" AND collection:{collection}"));
        }

        query
    }
}

/// Expand each whitespace-separated term into a field-boosted clause.
fn boosted_terms(text: &str) -> String {
    let clauses: Vec<String> = text
        .split_whitespace()
        .map(|term| {
            format!(
                "(title:{term}^100 OR salients:{term}^50 OR subject:{term}^25 OR description:{term}^15)"
            )
        })
        .collect();
    format!("( {} )", clauses.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(vec![
            "podcasts_mirror".into(),
            "web".into(),
            "webwidecrawl".into(),
            "samples_only".into(),
        ])
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let builder = builder();
        for text in ["", "   ", "\t\n"] {
            let request = SearchRequest::new(text);
            assert_eq!(builder.advanced(&request), None);
            assert_eq!(builder.alternate(&request), None);
        }
    }

    #[test]
    fn test_advanced_all_fields() {
        let query = builder()
            .advanced(&SearchRequest::new("piano works"))
            .unwrap();

        assert_eq!(
            query.query,
            "( (title:piano^100 OR salients:piano^50 OR subject:piano^25 OR description:piano^15) \
             (title:works^100 OR salients:works^50 OR subject:works^25 OR description:works^15) ) \
             AND NOT collection:podcasts_mirror AND NOT collection:web \
             AND NOT collection:webwidecrawl AND NOT collection:samples_only \
             AND (mediaType:audio OR mediaType:etree)"
        );
    }

    #[test]
    fn test_every_exclusion_is_present_once() {
        let builder = QueryBuilder::new(vec!["zeta".into(), "alpha".into(), "mid".into()]);
        let query = builder
            .advanced(&SearchRequest::new("x").field(SearchField::Creator))
            .unwrap()
            .query;

        for excluded in builder.excluded_collections() {
            let clause = format!(" AND NOT collection:{excluded}");
            assert_eq!(query.matches(&clause).count(), 1, "{clause}");
        }
    }

    #[test]
    fn test_creator_with_format_and_collection() {
        let request = SearchRequest::new("Hunter Lee Brown")
            .field(SearchField::Creator)
            .media_types(vec![MediaType::Audio])
            .format(FileFormat::VbrMp3)
            .collection("opensource_audio");
        let query = QueryBuilder::new(Vec::new()).advanced(&request).unwrap();

        assert_eq!(
            query.query,
            "creator:Hunter Lee Brown AND (mediaType:audio) AND format:\"VBR MP3\" \
             AND collection:opensource_audio"
        );
    }

    #[test]
    fn test_empty_media_set_has_no_clause() {
        let request = SearchRequest::new("x")
            .field(SearchField::Creator)
            .media_types(Vec::new());
        let query = QueryBuilder::new(Vec::new()).advanced(&request).unwrap();
        assert_eq!(query.query, "creator:x");
    }

    #[test]
    fn test_form_body() {
        let request = SearchRequest::new("bach")
            .field(SearchField::Creator)
            .media_types(Vec::new())
            .rows(20)
            .page(3);
        let query = QueryBuilder::new(vec!["web".into()])
            .advanced(&request)
            .unwrap();
        assert_eq!(
            query.form_body(),
            "q=creator:bach AND NOT collection:web&output=json&rows=20&page=3"
        );
    }

    #[test]
    fn test_alternate_is_raw_and_excludes_restricted() {
        let request = SearchRequest::new("hunterleebrown").format(FileFormat::VbrMp3);
        let query = QueryBuilder::new(vec!["web".into()])
            .alternate(&request)
            .unwrap();

        assert_eq!(
            query.user_query,
            "hunterleebrown AND NOT collection:web AND NOT access-restricted-item:true \
             AND (mediaType:audio OR mediaType:etree) AND format:\"VBR MP3\""
        );
        assert_eq!(
            query.query_pairs(),
            [
                ("user_query", query.user_query.clone()),
                ("hits_per_page", "50".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_top_collections_query() {
        let query = builder().top_collections(TopCollectionType::Movies, 100);
        assert_eq!(
            query.query,
            "mediatype:collection AND NOT hidden:true AND collection:movies"
        );
        assert_eq!(query.rows, 100);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_query_syntax_in_text_is_not_escaped() {
        // Backend operators in user text reach the backend untouched.
        let request = SearchRequest::new("a OR collection:web")
            .field(SearchField::Creator)
            .media_types(Vec::new());
        let query = QueryBuilder::new(vec!["web".into()])
            .advanced(&request)
            .unwrap();
        assert_eq!(
            query.query,
            "creator:a OR collection:web AND NOT collection:web"
        );

        let request = SearchRequest::new("x&rows=9999")
            .field(SearchField::Creator)
            .media_types(Vec::new());
        let body = QueryBuilder::new(Vec::new())
            .advanced(&request)
            .unwrap()
            .form_body();
        assert!(body.starts_with("q=creator:x&rows=9999&output=json"));
    }
}
