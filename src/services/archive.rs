// src/services/archive.rs

//! Request orchestration for metadata and search calls.
//!
//! Every call goes through [`ArchiveService::fetch`], which either hands the
//! request to the configured [`Transport`] or answers from the canned mock
//! payloads. Failures are classified in this order:
//!
//! 1. bad identifier (before anything is sent)
//! 2. no response at all -> `Unknown`
//! 3. status outside 200-299 -> `UnexpectedResponseCode`
//! 4. blank body, `null` or `{}` -> `NoData`
//! 5. body that does not match the schema -> `Decoding`

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::{ArchiveError, Result};
use crate::models::{
    AdvancedSearchEnvelope, AlternateSearchEnvelope, Config, Item, SearchConfig,
    SearchResultPage, ServiceMode, TopCollectionType,
};
use crate::query::{AdvancedQuery, QueryBuilder, SearchRequest};
use crate::services::feed::{ItemFeed, SearchFeed};
use crate::services::mock::{self, RequestKind};
use crate::services::transport::{HttpRequest, ReqwestTransport, Transport};
use crate::utils::{Endpoints, json};

/// Where response bodies come from.
#[derive(Clone)]
pub enum DataSource {
    Live(Arc<dyn Transport>),
    Mock,
}

impl DataSource {
    pub fn mode(&self) -> ServiceMode {
        match self {
            DataSource::Live(_) => ServiceMode::Live,
            DataSource::Mock => ServiceMode::Mock,
        }
    }
}

/// Client for the archive metadata and search services.
///
/// Cheap to clone; clones share the transport and configuration.
#[derive(Clone)]
pub struct ArchiveService {
    inner: Arc<Inner>,
}

struct Inner {
    source: DataSource,
    endpoints: Endpoints,
    queries: QueryBuilder,
    search: SearchConfig,
    max_concurrent: usize,
}

impl ArchiveService {
    /// Create a service using the data source selected by `service.mode`.
    pub fn new(config: &Config) -> Result<Self> {
        let source = match config.service.mode {
            ServiceMode::Live => DataSource::Live(Arc::new(ReqwestTransport::new(&config.client)?)),
            ServiceMode::Mock => DataSource::Mock,
        };
        Self::with_source(config, source)
    }

    /// Create a live service on top of a caller-provided transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_source(config, DataSource::Live(transport))
    }

    /// Create a service that never touches the network.
    pub fn mock(config: &Config) -> Result<Self> {
        Self::with_source(config, DataSource::Mock)
    }

    fn with_source(config: &Config, source: DataSource) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                source,
                endpoints: Endpoints::from_config(&config.endpoints)?,
                queries: QueryBuilder::new(config.search.excluded_collections.clone()),
                search: config.search.clone(),
                max_concurrent: config.client.max_concurrent.max(1),
            }),
        })
    }

    pub fn mode(&self) -> ServiceMode {
        self.inner.source.mode()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.inner.queries
    }

    /// A search request pre-filled with the configured rows and media types.
    pub fn search_request(&self, text: impl Into<String>) -> SearchRequest {
        SearchRequest::new(text)
            .rows(self.inner.search.default_rows)
            .media_types(self.inner.search.default_media_types.clone())
    }

    /// Fetch one item with its files.
    pub async fn item(&self, identifier: &str) -> Result<Item> {
        let url = self.inner.endpoints.metadata_url(identifier)?;
        let body = self.fetch(RequestKind::Metadata, HttpRequest::get(url)).await?;
        Item::from_json(&body)
    }

    /// Fetch one item and resolve the collections it belongs to.
    ///
    /// Collections that fail to load are logged and left out.
    pub async fn item_with_collections(&self, identifier: &str) -> Result<Item> {
        let mut item = self.item(identifier).await?;
        item.collection_archives = self
            .fetch_collections(item.metadata.collection.clone())
            .await
            .into_iter()
            .map(|(_, collection)| collection)
            .collect();
        Ok(item)
    }

    /// Search through the advancedsearch backend.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResultPage> {
        let query = self
            .inner
            .queries
            .advanced(request)
            .ok_or(ArchiveError::EmptyQueryString)?;
        check_paging(request)?;
        self.advanced_search(&query).await
    }

    /// Search through the page production backend.
    ///
    /// Collection titles reported alongside the hits are attached to each
    /// doc as basic collection items.
    pub async fn search_alternate(&self, request: &SearchRequest) -> Result<SearchResultPage> {
        let query = self
            .inner
            .queries
            .alternate(request)
            .ok_or(ArchiveError::EmptyQueryString)?;
        check_paging(request)?;

        let mut url = self.inner.endpoints.alternate_search.clone();
        url.query_pairs_mut().extend_pairs(query.query_pairs());

        let body = self
            .fetch(RequestKind::AlternateSearch, HttpRequest::get(url))
            .await?;
        let envelope: AlternateSearchEnvelope = json::decode(&body)?;
        Ok(envelope.into_page(request.rows, request.page))
    }

    /// List top-level collections of one kind that have a title and a
    /// description, sorted by title.
    pub async fn top_collections(&self, kind: TopCollectionType) -> Result<SearchResultPage> {
        let query = self
            .inner
            .queries
            .top_collections(kind, self.inner.search.top_collection_rows);
        let mut page = self.advanced_search(&query).await?;

        page.docs.retain(|doc| {
            doc.title.as_deref().is_some_and(|t| !t.trim().is_empty())
                && doc.description.iter().any(|d| !d.trim().is_empty())
        });
        page.docs
            .sort_by_cached_key(|doc| doc.title.as_deref().unwrap_or_default().to_lowercase());
        Ok(page)
    }

    /// Resolve the collections referenced by every doc of a search page.
    ///
    /// Each distinct collection is fetched once; failures are logged and
    /// the collection is left out.
    pub async fn resolve_collections(&self, mut page: SearchResultPage) -> SearchResultPage {
        let resolved: HashMap<String, Item> = self
            .fetch_collections(page.collection_ids())
            .await
            .into_iter()
            .collect();

        for doc in &mut page.docs {
            doc.collection_archives = doc
                .collection
                .iter()
                .filter_map(|id| resolved.get(id.as_str()).cloned())
                .collect();
        }
        page
    }

    /// Event-driven facade for item loads.
    pub fn item_feed(&self) -> ItemFeed {
        ItemFeed::new(self.clone())
    }

    /// Event-driven facade for searches.
    pub fn search_feed(&self) -> SearchFeed {
        SearchFeed::new(self.clone())
    }

    async fn advanced_search(&self, query: &AdvancedQuery) -> Result<SearchResultPage> {
        let request = HttpRequest::post_form(self.inner.endpoints.search.clone(), query.form_body());
        let body = self.fetch(RequestKind::Search, request).await?;
        let envelope: AdvancedSearchEnvelope = json::decode(&body)?;
        Ok(envelope.into())
    }

    /// Fetch collection items concurrently, keeping the input order.
    async fn fetch_collections(&self, identifiers: Vec<String>) -> Vec<(String, Item)> {
        if identifiers.is_empty() {
            return Vec::new();
        }
        log::debug!("Resolving {} collection(s)", identifiers.len());

        stream::iter(identifiers)
            .map(|id| {
                let service = self.clone();
                async move {
                    let result = service.item(&id).await;
                    (id, result)
                }
            })
            .buffered(self.inner.max_concurrent)
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(item) => Some((id, item)),
                    Err(error) => {
                        log::warn!("Failed to fetch collection {id}: {error}");
                        None
                    }
                }
            })
            .collect()
            .await
    }

    async fn fetch(&self, kind: RequestKind, request: HttpRequest) -> Result<Vec<u8>> {
        let transport = match &self.inner.source {
            DataSource::Live(transport) => transport,
            DataSource::Mock => {
                log::debug!("Serving mock {:?} payload for {}", kind, request.url);
                return Ok(mock::payload(kind).to_vec());
            }
        };

        log::debug!("{:?} {}", request.method, request.url);
        let response = transport.execute(request).await.map_err(|error| {
            if matches!(
                error,
                ArchiveError::Unknown(_) | ArchiveError::UnexpectedResponseCode(_)
            ) {
                error
            } else {
                ArchiveError::unknown(error)
            }
        })?;

        if !response.is_success() {
            return Err(ArchiveError::UnexpectedResponseCode(response.status));
        }
        Ok(response.body)
    }
}

fn check_paging(request: &SearchRequest) -> Result<()> {
    if request.rows == 0 {
        return Err(ArchiveError::bad_parameters("rows must be at least 1"));
    }
    if request.page == 0 {
        return Err(ArchiveError::bad_parameters("page must be at least 1"));
    }
    Ok(())
}
