// src/services/feed.rs

//! Event-driven facades over [`ArchiveService`].
//!
//! A feed tracks at most one request at a time. Issuing a new request aborts
//! the task of the previous one and bumps a generation counter; a result from
//! an older generation is dropped and never published.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{ArchiveError, Result};
use crate::models::{Item, SearchResultPage};
use crate::query::SearchRequest;
use crate::services::archive::ArchiveService;

/// Lifecycle of the request a feed is tracking.
#[derive(Debug, Clone)]
pub enum RequestState<T> {
    Idle,
    InFlight { generation: u64 },
    Resolved(T),
    Failed(Arc<ArchiveError>),
}

impl<T> RequestState<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight { .. })
    }
}

struct Slot<T> {
    generation: u64,
    state: RequestState<T>,
}

/// Publishes the state of the latest request of one kind.
///
/// [`RequestFeed::issue`] spawns onto the current Tokio runtime.
pub struct RequestFeed<T> {
    slot: Arc<watch::Sender<Slot<T>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Default for RequestFeed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestFeed<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Slot {
            generation: 0,
            state: RequestState::Idle,
        });
        Self {
            slot: Arc::new(sender),
            task: Mutex::new(None),
        }
    }

    /// Current state.
    pub fn state(&self) -> RequestState<T> {
        self.slot.borrow().state.clone()
    }

    /// Wait until the tracked request settles and return its state.
    ///
    /// Returns `Idle` when nothing was ever issued.
    pub async fn settled(&self) -> RequestState<T> {
        let mut receiver = self.slot.subscribe();
        match receiver.wait_for(|slot| !slot.state.is_in_flight()).await {
            Ok(slot) => slot.state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> FeedReceiver<T> {
        FeedReceiver {
            receiver: self.slot.subscribe(),
        }
    }

    /// Start tracking `request`, superseding whatever was tracked before.
    ///
    /// Returns the generation assigned to the new request.
    pub fn issue<F>(&self, request: F) -> u64
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let mut task = self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let mut generation = 0;
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            generation = slot.generation;
            slot.state = RequestState::InFlight { generation };
        });

        let slot = Arc::clone(&self.slot);
        *task = Some(tokio::spawn(async move {
            let next = match request.await {
                Ok(value) => RequestState::Resolved(value),
                Err(error) => RequestState::Failed(Arc::new(error)),
            };
            // Generation check and publish happen under the channel lock.
            let published = slot.send_if_modified(|current| {
                if current.generation != generation {
                    return false;
                }
                current.state = next;
                true
            });
            if !published {
                log::debug!("Dropped superseded result of request #{generation}");
            }
        }));

        generation
    }
}

impl<T> Drop for RequestFeed<T> {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

/// Receiving side of a [`RequestFeed`].
pub struct FeedReceiver<T> {
    receiver: watch::Receiver<Slot<T>>,
}

impl<T: Clone> FeedReceiver<T> {
    /// Wait for the next state change. `None` once the feed is gone.
    pub async fn changed(&mut self) -> Option<RequestState<T>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().state.clone())
    }

    pub fn current(&self) -> RequestState<T> {
        self.receiver.borrow().state.clone()
    }
}

/// Feed of item loads, collections included.
pub struct ItemFeed {
    service: ArchiveService,
    feed: RequestFeed<Item>,
}

impl ItemFeed {
    pub(crate) fn new(service: ArchiveService) -> Self {
        Self {
            service,
            feed: RequestFeed::new(),
        }
    }

    pub fn load(&self, identifier: impl Into<String>) -> u64 {
        let service = self.service.clone();
        let identifier = identifier.into();
        self.feed
            .issue(async move { service.item_with_collections(&identifier).await })
    }

    pub fn feed(&self) -> &RequestFeed<Item> {
        &self.feed
    }
}

/// Feed of searches against either backend.
pub struct SearchFeed {
    service: ArchiveService,
    feed: RequestFeed<SearchResultPage>,
}

impl SearchFeed {
    pub(crate) fn new(service: ArchiveService) -> Self {
        Self {
            service,
            feed: RequestFeed::new(),
        }
    }

    pub fn search(&self, request: SearchRequest) -> u64 {
        let service = self.service.clone();
        self.feed
            .issue(async move { service.search(&request).await })
    }

    pub fn search_alternate(&self, request: SearchRequest) -> u64 {
        let service = self.service.clone();
        self.feed
            .issue(async move { service.search_alternate(&request).await })
    }

    pub fn feed(&self) -> &RequestFeed<SearchResultPage> {
        &self.feed
    }
}
