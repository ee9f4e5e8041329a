//! Search result pages and the two upstream envelopes they are decoded from.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::item::Item;
use crate::models::lenient;
use crate::models::media::MediaType;

/// Summary projection of an item as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    pub identifier: String,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub creator: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub subject: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub description: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub collection: Vec<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub date: Option<String>,

    #[serde(default, rename = "mediatype")]
    pub media_type: MediaType,

    /// Collection items resolved after the search returned
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub collection_archives: Vec<Item>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResultPage {
    /// Total number of matches across all pages
    pub num_found: u64,

    /// Offset of the first doc in this page
    pub start: u64,

    pub docs: Vec<SearchDoc>,
}

impl SearchResultPage {
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Distinct collection identifiers referenced by the docs, in first-seen order.
    pub fn collection_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.docs.iter().flat_map(|doc| doc.collection.iter()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

// --- advancedsearch envelope ---

#[derive(Debug, Deserialize)]
pub(crate) struct AdvancedSearchEnvelope {
    response: AdvancedSearchBody,
}

#[derive(Debug, Deserialize)]
struct AdvancedSearchBody {
    #[serde(rename = "numFound", default)]
    num_found: u64,

    #[serde(default)]
    start: u64,

    #[serde(default)]
    docs: Vec<SearchDoc>,
}

impl From<AdvancedSearchEnvelope> for SearchResultPage {
    fn from(envelope: AdvancedSearchEnvelope) -> Self {
        let body = envelope.response;
        Self {
            num_found: body.num_found,
            start: body.start,
            docs: body.docs,
        }
    }
}

// --- page production envelope ---

#[derive(Debug, Deserialize)]
pub(crate) struct AlternateSearchEnvelope {
    response: AlternateResponse,
}

#[derive(Debug, Deserialize)]
struct AlternateResponse {
    body: AlternateBody,
}

#[derive(Debug, Deserialize)]
struct AlternateBody {
    hits: AlternateHits,

    #[serde(default, deserialize_with = "collection_titles")]
    collection_titles: HashMap<String, CollectionTitle>,
}

#[derive(Debug, Deserialize)]
struct AlternateHits {
    #[serde(default)]
    total: u64,

    #[serde(default)]
    hits: Vec<AlternateHit>,
}

#[derive(Debug, Deserialize)]
struct AlternateHit {
    fields: SearchDoc,
}

/// Display title of a collection referenced by alternate search hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTitle {
    pub identifier: String,
    pub title: String,
}

/// Accepts both `"key": "Title"` and `"key": {"identifier": .., "title": ..}`.
/// Entries of any other shape are skipped.
fn collection_titles<'de, D>(deserializer: D) -> Result<HashMap<String, CollectionTitle>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let entry = match value {
                Value::String(title) => CollectionTitle {
                    identifier: key.clone(),
                    title,
                },
                Value::Object(mut fields) => {
                    let title = match fields.remove("title") {
                        Some(Value::String(title)) => title,
                        _ => return None,
                    };
                    let identifier = match fields.remove("identifier") {
                        Some(Value::String(identifier)) => identifier,
                        _ => key.clone(),
                    };
                    CollectionTitle { identifier, title }
                }
                _ => return None,
            };
            Some((key, entry))
        })
        .collect())
}

impl AlternateSearchEnvelope {
    /// Adapt to the common page shape. `start` is derived from the paging
    /// that produced the request since this backend does not report it.
    pub(crate) fn into_page(self, rows: u32, page: u32) -> SearchResultPage {
        let body = self.response.body;
        let titles = body.collection_titles;

        let docs = body
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let mut doc = hit.fields;
                doc.description.truncate(1);
                doc.collection_archives = doc
                    .collection
                    .iter()
                    .filter_map(|id| titles.get(id))
                    .map(|entry| {
                        Item::collection_stub(entry.identifier.clone(), Some(entry.title.clone()))
                    })
                    .collect();
                doc
            })
            .collect();

        SearchResultPage {
            num_found: body.hits.total,
            start: u64::from(page.saturating_sub(1)) * u64::from(rows),
            docs,
        }
    }
}
